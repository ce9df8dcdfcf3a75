//! Entity decoding for filtered message text.
//!
//! Only text between the tags emitted by the markup filter is decoded.
//! Decoded text is re-escaped for `&`, `<` and `>`, so a decoded `&lt;b&gt;`
//! stays visible text instead of turning into markup.

use regex::Regex;
use std::sync::LazyLock;

static FILTERED_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"</?(?:b|strong|i|em|u|s|pre)>|<a href="[^"<>]*">|</a>"#)
        .expect("FILTERED_TAG_RE: hardcoded regex is valid")
});

/// Decodes named and numeric HTML entities. Unknown entities are left as
/// text.
pub fn decode_entities(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for tag in FILTERED_TAG_RE.find_iter(text) {
        push_decoded(&mut output, &text[cursor..tag.start()]);
        output.push_str(tag.as_str());
        cursor = tag.end();
    }
    push_decoded(&mut output, &text[cursor..]);

    output
}

fn push_decoded(output: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(segment);
    html_escape::encode_text_to_string(decoded, output);
}
