use crate::domain::{
    LeadImageUrl, MessageChunks, NewsletterHtml, SplitError, extract_lead_image,
    render_message_text,
};
use crate::newsletter_delivery::{
    DeliveryOptions, DeliveryQueue, DeliveryReport, DispatchError, MessageDelivery,
};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::error_chain_fmt;
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub message_limit: usize,
    pub delivery: DeliveryOptions,
}

#[derive(Debug)]
pub struct RenderedNewsletter {
    pub text: String,
    pub lead_image: Option<LeadImageUrl>,
}

#[derive(thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Unsplittable(#[from] SplitError),
    #[error(transparent)]
    Delivery(#[from] DispatchError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Produces the message text and the lead image. Both read the same raw
/// HTML and do not depend on each other, so they run side by side on the
/// blocking pool.
#[tracing::instrument(name = "Render newsletter", skip_all, fields(html_len = html.as_ref().len()))]
pub async fn render_newsletter(html: NewsletterHtml) -> Result<RenderedNewsletter, anyhow::Error> {
    let html = Arc::new(html);

    let text_task = {
        let html = Arc::clone(&html);
        spawn_blocking_with_tracing(move || render_message_text(&html))
    };
    let image_task = spawn_blocking_with_tracing(move || {
        let html: &NewsletterHtml = &html;
        extract_lead_image(html.as_ref())
    });

    let (text, lead_image) = tokio::try_join!(text_task, image_task)
        .context("Failed to run the newsletter rendering tasks")?;

    Ok(RenderedNewsletter { text, lead_image })
}

/// Renders the newsletter and delivers it. The text is split before
/// anything is sent, so an unsplittable newsletter sends nothing.
#[tracing::instrument(
    name = "Relay newsletter",
    skip_all,
    fields(chat_id = %settings.delivery.chat_id, message_limit = settings.message_limit)
)]
pub async fn relay_newsletter<D>(
    delivery: &D,
    html: NewsletterHtml,
    settings: &RelaySettings,
) -> Result<DeliveryReport, RelayError>
where
    D: MessageDelivery + ?Sized,
{
    let rendered = render_newsletter(html).await?;
    let chunks = MessageChunks::split(&rendered.text, settings.message_limit)?;

    tracing::info!(
        chunks = chunks.len(),
        lead_image = rendered.lead_image.is_some(),
        "Newsletter rendered"
    );

    let queue = DeliveryQueue::build(chunks, rendered.lead_image.as_ref(), &settings.delivery);
    let report = queue.drain(delivery).await?;

    Ok(report)
}
