mod cleanup;
mod entities;
mod lead_image;
mod markup_filter;
mod message_chunks;
mod newsletter_html;
mod normalize;
mod types;

pub use cleanup::cleanup_text;
pub use entities::decode_entities;
pub use lead_image::{LeadImageUrl, extract_lead_image};
pub use markup_filter::{ALLOWED_TAGS, filter_markup};
pub use message_chunks::{MessageChunks, SplitError, TELEGRAM_MESSAGE_LIMIT};
pub use newsletter_html::NewsletterHtml;
pub use normalize::normalize_html;
pub use types::*;

/// Runs the text stages in order: normalize, filter, decode, clean up.
pub fn render_message_text(html: &NewsletterHtml) -> String {
    let normalized = normalize_html(html.as_ref());
    let filtered = filter_markup(&normalized);
    let decoded = decode_entities(&filtered);
    cleanup_text(&decoded)
}
