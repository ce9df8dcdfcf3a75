/// Raw newsletter HTML as delivered by the webhook trigger.
///
/// Only blank payloads are rejected. Anything else is handed to the
/// transform stages, which accept arbitrary strings.
#[derive(Debug)]
pub struct NewsletterHtml(String);

impl NewsletterHtml {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("Invalid newsletter HTML: cannot be empty.".to_string());
        }

        Ok(Self(s))
    }
}

impl AsRef<str> for NewsletterHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NewsletterHtml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
