//! Reduces normalized HTML to the rich-text subset the messaging API
//! renders: `a[href]`, `b`, `strong`, `i`, `em`, `u`, `s` and `pre`.
//!
//! Every other tag is dropped while its inner text is kept. Surviving tags
//! lose all attributes except an anchor's `href`, and are re-balanced so
//! that each opening tag has a matching closing tag. Stray angle brackets
//! in text are escaped, which makes the filter idempotent.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub const ALLOWED_TAGS: [&str; 8] = ["a", "b", "strong", "i", "em", "u", "s", "pre"];

const ALLOWED_URL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tg"];

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<![^>]*>|<(?P<closing>/?)(?P<name>[a-zA-Z][a-zA-Z0-9:_.-]*)(?P<attributes>(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?)(?P<self_closing>/?)>"#,
    )
    .expect("TOKEN_RE: hardcoded regex is valid")
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<name>[a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"(?P<double>[^"]*)"|'(?P<single>[^']*)'|(?P<bare>[^\s"'<>`]+)))?"#,
    )
    .expect("ATTRIBUTE_RE: hardcoded regex is valid")
});

/// Strips `html` down to the allow-listed tag set. Total over any input.
pub fn filter_markup(html: &str) -> String {
    let mut filter = MarkupFilter::default();
    let mut cursor = 0;

    for caps in TOKEN_RE.captures_iter(html) {
        let Some(token) = caps.get(0) else { continue };
        filter.push_text(&html[cursor..token.start()]);
        cursor = token.end();

        // Comments and declarations carry no name and are dropped outright.
        let Some(name) = caps.name("name") else {
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();
        let attributes = caps.name("attributes").map_or("", |m| m.as_str());
        let closing = caps.name("closing").is_some_and(|m| !m.is_empty());
        let self_closing = caps.name("self_closing").is_some_and(|m| !m.is_empty())
            || ends_with_self_closing_slash(attributes);

        if closing {
            filter.close(&name);
        } else if !self_closing {
            filter.open(&name, attributes);
        }
    }
    filter.push_text(&html[cursor..]);

    filter.finish()
}

#[derive(Default)]
struct MarkupFilter {
    output: Vec<String>,
    open_tags: Vec<&'static str>,
}

impl MarkupFilter {
    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.output
                .push(text.replace('<', "&lt;").replace('>', "&gt;"));
        }
    }

    fn open(&mut self, name: &str, attributes: &str) {
        let Some(tag) = ALLOWED_TAGS.iter().copied().find(|tag| *tag == name) else {
            return;
        };

        if tag != "a" {
            self.output.push(format!("<{tag}>"));
            self.open_tags.push(tag);
            return;
        }

        // Anchors never nest: a new anchor ends the current one.
        if self.open_tags.contains(&"a") {
            self.close("a");
        }
        // Without a usable href the anchor is unwrapped, its text survives.
        if let Some(href) = anchor_href(attributes) {
            self.output.push(format!("<a href=\"{href}\">"));
            self.open_tags.push(tag);
        }
    }

    fn close(&mut self, name: &str) {
        let Some(position) = self.open_tags.iter().rposition(|tag| *tag == name) else {
            return;
        };
        while self.open_tags.len() > position {
            if let Some(tag) = self.open_tags.pop() {
                self.emit_closing_tag(tag);
            }
        }
    }

    fn emit_closing_tag(&mut self, tag: &'static str) {
        // An anchor closed right after it was opened has no text to link.
        let empty_anchor = tag == "a"
            && self
                .output
                .last()
                .is_some_and(|piece| piece.starts_with("<a "));
        if empty_anchor {
            self.output.pop();
        } else {
            self.output.push(format!("</{tag}>"));
        }
    }

    fn finish(mut self) -> String {
        while let Some(tag) = self.open_tags.pop() {
            self.emit_closing_tag(tag);
        }
        self.output.concat()
    }
}

fn anchor_href(attributes: &str) -> Option<String> {
    let caps = ATTRIBUTE_RE
        .captures_iter(attributes)
        .find(|caps| caps["name"].eq_ignore_ascii_case("href"))?;
    let value = caps
        .name("double")
        .or_else(|| caps.name("single"))
        .or_else(|| caps.name("bare"))?
        .as_str()
        .trim();

    let url = Url::parse(value).ok()?;
    if !ALLOWED_URL_SCHEMES.contains(&url.scheme()) {
        return None;
    }

    // Opaque URLs such as `mailto:` are serialized without escaping quotes.
    Some(
        url.as_str()
            .replace('"', "%22")
            .replace('<', "%3C")
            .replace('>', "%3E"),
    )
}

fn ends_with_self_closing_slash(attributes: &str) -> bool {
    let trimmed = attributes.trim_end();
    match trimmed.strip_suffix('/') {
        Some(rest) => rest.ends_with(|c: char| c.is_whitespace() || c == '"' || c == '\''),
        None => false,
    }
}
