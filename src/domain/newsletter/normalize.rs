//! First pass over raw newsletter HTML.
//!
//! Block elements are flattened onto a single line so that the later
//! passes can treat newlines as the only structural separator. Matching is
//! regex based: nested or unbalanced markup (a `<p>` inside a `<li>`, a
//! missing `</p>`) is rewritten best-effort and may not come out tidy.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>.*?</p>").expect("PARAGRAPH_RE: hardcoded regex is valid")
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<li(?:\s[^>]*)?>(.*?)</li>")
        .expect("LIST_ITEM_RE: hardcoded regex is valid")
});

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<a(?:\s[^>]*)?>.*?</a>").expect("ANCHOR_RE: hardcoded regex is valid")
});

static SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<span(?:\s[^>]*)?>.*?</span>").expect("SPAN_RE: hardcoded regex is valid")
});

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h[1-3](?:\s[^>]*)?>(.*?)</h[1-3]>")
        .expect("HEADING_RE: hardcoded regex is valid")
});

static LIST_WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:ul|ol)(?:\s[^>]*)?>").expect("LIST_WRAPPER_RE: hardcoded regex is valid")
});

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("LINE_BREAK_RE: hardcoded regex is valid"));

/// Rewrites raw HTML into the reduced, line-oriented form the markup
/// filter expects. Total over any input.
pub fn normalize_html(html: &str) -> String {
    let text = PARAGRAPH_RE.replace_all(html, |caps: &Captures| {
        format!("\n{}", strip_newlines(&caps[0]))
    });
    let text = LIST_ITEM_RE.replace_all(&text, |caps: &Captures| {
        format!("\n* {}", strip_newlines(&caps[1]))
    });
    let text = ANCHOR_RE.replace_all(&text, |caps: &Captures| strip_newlines(&caps[0]));
    let text = SPAN_RE.replace_all(&text, |caps: &Captures| strip_newlines(&caps[0]));
    let text = HEADING_RE.replace_all(&text, |caps: &Captures| {
        format!("\n<b>{}</b>\n", strip_newlines(&caps[1]))
    });
    let text = LIST_WRAPPER_RE.replace_all(&text, "\n");
    let text = LINE_BREAK_RE.replace_all(&text, "\n");

    text.into_owned()
}

fn strip_newlines(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
