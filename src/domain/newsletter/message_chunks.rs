//! Line-aligned splitting of message text into size-bounded chunks.

use regex::Regex;
use std::sync::LazyLock;

/// Hard per-message size limit of the Telegram Bot API, in characters.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    #[error(
        "No line break within {limit} characters after offset {offset}; the text cannot be split without cutting through content."
    )]
    NoLineBreak { offset: usize, limit: usize },
}

static ELEMENT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?P<closing>/?)(?:a|b|strong|i|em|u|s|pre)\b[^>]*>")
        .expect("ELEMENT_TAG_RE: hardcoded regex is valid")
});

/// Ordered message segments. Joining them with `\n` gives back the
/// original text; every segment holds at most `limit` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChunks(Vec<String>);

impl MessageChunks {
    /// Splits `text` at a newline inside the first `limit` characters of
    /// whatever is left, until the remainder fits.
    ///
    /// The last newline where no element is open wins, so a `<pre>` or `<b>`
    /// block stays in one message when the window allows it. Otherwise the
    /// last newline in the window is used and the element spans two chunks,
    /// which the messaging API may refuse to render.
    ///
    /// Text that fits is returned as a single chunk. A window without any
    /// newline is an error: cutting inside a line could split a tag.
    pub fn split(text: &str, limit: usize) -> Result<Self, SplitError> {
        let mut chunks = Vec::new();
        let mut remaining = text;
        let mut offset = 0;

        loop {
            // `nth(limit)` is only `Some` when more than `limit` characters are left.
            let Some((window_end, _)) = remaining.char_indices().nth(limit) else {
                chunks.push(remaining.to_string());
                return Ok(Self(chunks));
            };

            let Some(newline) = split_point(&remaining[..window_end]) else {
                return Err(SplitError::NoLineBreak { offset, limit });
            };

            chunks.push(remaining[..newline].to_string());
            offset += remaining[..=newline].chars().count();
            remaining = &remaining[newline + 1..];
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Byte offset of the newline to split at: the last one outside any
/// element, else the last one.
fn split_point(window: &str) -> Option<usize> {
    let mut tags = ELEMENT_TAG_RE.captures_iter(window).peekable();
    let mut depth = 0usize;
    let mut last_balanced = None;
    let mut last = None;

    for (newline, _) in window.match_indices('\n') {
        while let Some(tag) =
            tags.next_if(|caps| caps.get(0).is_some_and(|m| m.end() <= newline))
        {
            if tag["closing"].is_empty() {
                depth += 1;
            } else {
                depth = depth.saturating_sub(1);
            }
        }
        if depth == 0 {
            last_balanced = Some(newline);
        }
        last = Some(newline);
    }

    last_balanced.or(last)
}

impl IntoIterator for MessageChunks {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
