use serde::{Deserialize, Serialize};

/// Title used when a document has no usable `<title>` element
pub const NO_TITLE_FOUND: &str = "no title found";

/// Flat content record produced for a single fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// URL of the page, exactly as requested
    pub url: String,

    /// Document title, or [`NO_TITLE_FOUND`]
    pub title: String,

    /// Visible body text, newline separated and truncated
    pub text: String,

    /// Non-empty anchor hrefs in document order
    pub links: Vec<String>,
}

impl PageContent {
    /// Create a new content record
    pub fn new(url: String, title: String, text: String, links: Vec<String>) -> Self {
        Self {
            url,
            title,
            text,
            links,
        }
    }

    /// Whether the page had a title element with text
    pub fn has_title(&self) -> bool {
        self.title != NO_TITLE_FOUND
    }
}
