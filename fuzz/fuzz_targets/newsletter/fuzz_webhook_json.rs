// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_webhook_json
// Purpose: fuzz the webhook JSON body -> NewsletterHtml
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_relay::domain::{NewsletterHtml, NewsletterWebhookPayload};

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<NewsletterWebhookPayload>(data) {
        let _ = NewsletterHtml::try_from(payload);
    }
});
