use crate::build_error_response;
use crate::domain::{NewsletterHtml, NewsletterWebhookPayload};
use crate::newsletter_pipeline::{RelayError, RelaySettings, relay_newsletter};
use crate::telegram_client::TelegramClient;
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use tracing::Span;
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    RelayError(#[from] RelayError),
}

impl std::fmt::Debug for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WebhookError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            WebhookError::ValidationError(_) => StatusCode::BAD_REQUEST,
            WebhookError::RelayError(RelayError::Unsplittable(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WebhookError::RelayError(RelayError::Delivery(_)) => StatusCode::BAD_GATEWAY,
            WebhookError::RelayError(RelayError::Unexpected(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        build_error_response(status_code, self.to_string())
    }
}

#[derive(Serialize)]
struct WebhookResponse {
    invocation_id: Uuid,
    chunks_delivered: usize,
    lead_image_sent: bool,
}

#[tracing::instrument(
    name = "Relay newsletter webhook",
    skip_all,
    fields(invocation_id = tracing::field::Empty)
)]
pub async fn receive_newsletter(
    payload: web::Json<NewsletterWebhookPayload>,
    telegram_client: web::Data<TelegramClient>,
    settings: web::Data<RelaySettings>,
) -> Result<HttpResponse, WebhookError> {
    let invocation_id = Uuid::new_v4();
    Span::current().record("invocation_id", tracing::field::display(&invocation_id));

    let html: NewsletterHtml = payload
        .into_inner()
        .try_into()
        .map_err(WebhookError::ValidationError)?;

    let report = relay_newsletter(telegram_client.get_ref(), html, &settings).await?;

    tracing::info!(
        chunks_delivered = report.text_messages_sent,
        lead_image_sent = report.lead_image_sent,
        "Newsletter relayed"
    );

    Ok(HttpResponse::Ok().json(WebhookResponse {
        invocation_id,
        chunks_delivered: report.text_messages_sent,
        lead_image_sent: report.lead_image_sent,
    }))
}
