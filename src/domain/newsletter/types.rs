use crate::domain::NewsletterHtml;
use serde::Deserialize;

/// Inbound webhook body. Some triggers send the HTML under `data`.
#[derive(Deserialize, Debug)]
pub struct NewsletterWebhookPayload {
    #[serde(alias = "data")]
    html: String,
}

impl TryFrom<NewsletterWebhookPayload> for NewsletterHtml {
    type Error = String;

    fn try_from(payload: NewsletterWebhookPayload) -> Result<Self, Self::Error> {
        NewsletterHtml::parse(payload.html)
    }
}
