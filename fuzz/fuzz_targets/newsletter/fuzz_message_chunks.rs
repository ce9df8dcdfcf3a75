// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_message_chunks
// Purpose: chunks rejoin to the input and respect the limit
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use newsletter_relay::domain::MessageChunks;

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    limit: u16,
}

fuzz_target!(|input: Input| {
    let limit = usize::from(input.limit.max(1));
    if let Ok(chunks) = MessageChunks::split(&input.text, limit) {
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= limit));
        assert_eq!(chunks.iter().collect::<Vec<_>>().join("\n"), input.text);
    }
});
