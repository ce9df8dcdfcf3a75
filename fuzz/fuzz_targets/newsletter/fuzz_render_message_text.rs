// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_render_message_text
// Purpose: run arbitrary HTML through every text stage
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_relay::domain::{NewsletterHtml, render_message_text};

fuzz_target!(|data: &str| {
    if let Ok(html) = NewsletterHtml::parse(data.to_string()) {
        let _ = render_message_text(&html);
    }
});
