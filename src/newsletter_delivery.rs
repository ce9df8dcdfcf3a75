use crate::domain::{LeadImageUrl, MessageChunks};
use crate::utils::error_chain_fmt;
use std::collections::VecDeque;

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("Messaging API rejected the request with status {status}: {description}")]
    Rejected { status: u16, description: String },
}

/// Rich-text message sent to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: String,
    pub text: String,
    pub disable_notification: bool,
    pub disable_link_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMessage {
    pub chat_id: String,
    pub photo_url: String,
}

/// Outbound side of the pipeline. Implemented by `TelegramClient`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MessageDelivery {
    async fn send_text(&self, message: &TextMessage) -> Result<(), DeliveryError>;

    async fn send_photo(&self, message: &PhotoMessage) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    pub chat_id: String,
    pub disable_notification: bool,
    pub disable_link_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    Photo(PhotoMessage),
    Text(TextMessage),
}

impl OutgoingMessage {
    fn content(&self) -> &str {
        match self {
            OutgoingMessage::Photo(photo) => &photo.photo_url,
            OutgoingMessage::Text(text) => &text.text,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub text_messages_sent: usize,
    pub lead_image_sent: bool,
    pub failed: usize,
}

/// Some queued messages failed. Everything counted in `report` as sent
/// stays delivered: nothing is rolled back or retried.
#[derive(thiserror::Error)]
#[error(
    "Message {position} of {total} could not be delivered ({} failed in total)",
    .report.failed
)]
pub struct DispatchError {
    pub position: usize,
    pub total: usize,
    pub report: DeliveryReport,
    #[source]
    pub source: DeliveryError,
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Ordered outbound messages for one newsletter: the lead image first, then
/// the text chunks in reading order.
#[derive(Debug, Default)]
pub struct DeliveryQueue(VecDeque<OutgoingMessage>);

impl DeliveryQueue {
    pub fn build(
        chunks: MessageChunks,
        lead_image: Option<&LeadImageUrl>,
        options: &DeliveryOptions,
    ) -> Self {
        let mut queue = VecDeque::with_capacity(chunks.len() + 1);

        if let Some(image) = lead_image {
            queue.push_back(OutgoingMessage::Photo(PhotoMessage {
                chat_id: options.chat_id.clone(),
                photo_url: image.as_ref().to_string(),
            }));
        }

        for chunk in chunks {
            // The messaging API refuses empty messages.
            if chunk.trim().is_empty() {
                tracing::debug!("Skipping a blank chunk");
                continue;
            }
            queue.push_back(OutgoingMessage::Text(TextMessage {
                chat_id: options.chat_id.clone(),
                text: chunk,
                disable_notification: options.disable_notification,
                disable_link_preview: options.disable_link_preview,
            }));
        }

        Self(queue)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutgoingMessage> {
        self.0.iter()
    }

    /// Sends every queued message one at a time, in order. A failed message
    /// is logged and the remaining ones are still sent; the first failure
    /// becomes the result.
    #[tracing::instrument(name = "Drain delivery queue", skip_all, fields(queued = self.0.len()))]
    pub async fn drain<D>(mut self, delivery: &D) -> Result<DeliveryReport, DispatchError>
    where
        D: MessageDelivery + ?Sized,
    {
        let total = self.0.len();
        let mut report = DeliveryReport::default();
        let mut first_failure = None;
        let mut position = 0;

        while let Some(message) = self.0.pop_front() {
            position += 1;
            let outcome = match &message {
                OutgoingMessage::Photo(photo) => delivery.send_photo(photo).await,
                OutgoingMessage::Text(text) => delivery.send_text(text).await,
            };

            match outcome {
                Ok(()) => match message {
                    OutgoingMessage::Photo(_) => report.lead_image_sent = true,
                    OutgoingMessage::Text(_) => report.text_messages_sent += 1,
                },
                Err(e) => {
                    tracing::error!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        position,
                        total,
                        content = %message.content(),
                        "Failed to deliver a queued message. Continuing with the rest of the queue.",
                    );
                    report.failed += 1;
                    first_failure.get_or_insert((position, e));
                }
            }
        }

        match first_failure {
            None => Ok(report),
            Some((position, source)) => Err(DispatchError {
                position,
                total,
                report,
                source,
            }),
        }
    }
}
