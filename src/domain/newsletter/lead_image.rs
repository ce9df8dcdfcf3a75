//! Picks the newsletter's hero image out of the raw HTML.
//!
//! Transactional email templates size their images with explicit `height`
//! and `width` attributes, which is enough to tell a hero image apart from
//! tracking pixels and icons without laying the page out.

use regex::Regex;
use std::sync::LazyLock;

const MIN_LEAD_HEIGHT: f64 = 100.0;
const MIN_LEAD_WIDTH: f64 = 500.0;

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("IMG_TAG_RE: hardcoded regex is valid"));

static SRC_RE: LazyLock<Regex> = LazyLock::new(|| attribute_regex("src"));
static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| attribute_regex("height"));
static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| attribute_regex("width"));

fn attribute_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)[\s"']{name}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
    ))
    .expect("attribute regex built from a hardcoded name is valid")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadImageUrl(String);

impl LeadImageUrl {
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid image URL: cannot be empty.".to_string());
        }

        if trimmed.len() > 2048 {
            return Err("Invalid image URL: cannot be longer than 2048 characters.".to_string());
        }

        let forbidden_chars = ['\0', '\n', '\r', '\t', ' '];
        if trimmed.chars().any(|c| forbidden_chars.contains(&c)) {
            return Err("Invalid image URL: contains forbidden characters.".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for LeadImageUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LeadImageUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Returns the `src` of the first `<img>` in document order that looks like
/// a lead image: taller than 100, or, when it has no numeric height, wider
/// than 500. Images without a usable `src` are skipped.
pub fn extract_lead_image(html: &str) -> Option<LeadImageUrl> {
    IMG_TAG_RE
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| is_lead_sized(tag))
        .find_map(|tag| {
            let src = attribute(tag, &SRC_RE)?;
            LeadImageUrl::parse(html_escape::decode_html_entities(src).into_owned()).ok()
        })
}

fn is_lead_sized(tag: &str) -> bool {
    match attribute(tag, &HEIGHT_RE).and_then(parse_dimension) {
        Some(height) => height > MIN_LEAD_HEIGHT,
        None => attribute(tag, &WIDTH_RE)
            .and_then(parse_dimension)
            .is_some_and(|width| width > MIN_LEAD_WIDTH),
    }
}

fn attribute<'a>(tag: &'a str, re: &Regex) -> Option<&'a str> {
    let caps = re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

fn parse_dimension(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim_end();
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
