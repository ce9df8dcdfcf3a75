//! Final tidy-up of decoded message text.
//!
//! Steps run in a fixed order. Blank-line collapsing has to follow the
//! empty-tag removal, otherwise removed tags leave runs of three or more
//! newlines behind.

use regex::Regex;
use std::sync::LazyLock;

static EMPTY_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<b>\s*</b>").expect("EMPTY_BOLD_RE: hardcoded regex is valid"));

static EMPTY_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a(?:\s[^>]*)?>\s*</a>").expect("EMPTY_ANCHOR_RE: hardcoded regex is valid")
});

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n\s*\n").expect("BLANK_LINES_RE: hardcoded regex is valid")
});

static INDENTED_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\n[^\S\n]+").expect("INDENTED_PARAGRAPH_RE: hardcoded regex is valid")
});

static BRACKETED_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:<|&lt;)[^<>@\s&;]+@[^<>@\s&;]+(?:>|&gt;)")
        .expect("BRACKETED_ADDRESS_RE: hardcoded regex is valid")
});

pub fn cleanup_text(text: &str) -> String {
    let text = EMPTY_BOLD_RE.replace_all(text, "");
    let text = EMPTY_ANCHOR_RE.replace_all(&text, "");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    let text = text.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let text = INDENTED_PARAGRAPH_RE.replace_all(&text, "\n\n");
    let text = BRACKETED_ADDRESS_RE.replace_all(&text, "");

    text.into_owned()
}
