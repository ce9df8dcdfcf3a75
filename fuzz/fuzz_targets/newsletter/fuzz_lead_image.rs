// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_lead_image
// Purpose: extract_lead_image is total and deterministic
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_relay::domain::extract_lead_image;

fuzz_target!(|data: &str| {
    assert_eq!(extract_lead_image(data), extract_lead_image(data));
});
