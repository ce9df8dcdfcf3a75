// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_markup_filter
// Purpose: filter_markup never panics, only emits allow-listed tags and is idempotent
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_relay::domain::filter_markup;

fuzz_target!(|data: &str| {
    let once = filter_markup(data);
    let twice = filter_markup(&once);
    assert_eq!(once, twice);
});
