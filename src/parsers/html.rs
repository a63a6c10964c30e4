use crate::config::FetchConfig;
use crate::error::ParseError;
use crate::parsers::text;
use crate::results::NO_TITLE_FOUND;
use scraper::{Html, Selector};

/// Options controlling how content is pulled out of a rendered document
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Tag names whose subtrees are removed before text extraction
    pub noise_tags: Vec<String>,
    /// Maximum number of characters kept in the extracted text
    pub max_text_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for ExtractOptions {
    fn from(config: &FetchConfig) -> Self {
        Self {
            noise_tags: config.noise_tags.clone(),
            max_text_chars: config.max_text_chars,
        }
    }
}

impl ExtractOptions {
    /// Selector matching every noise tag, or `None` when no tags are configured
    pub fn noise_selector(&self) -> Result<Option<Selector>, ParseError> {
        if self.noise_tags.is_empty() {
            return Ok(None);
        }
        Selector::parse(&self.noise_tags.join(", "))
            .map(Some)
            .map_err(|e| ParseError::Selector(e.to_string()))
    }
}

/// Fields extracted from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub text: String,
    pub links: Vec<String>,
}

/// Parses rendered HTML and extracts title, body text and links
pub fn extract(html: &str, options: &ExtractOptions) -> Result<Extracted, ParseError> {
    let mut doc = Html::parse_document(html);

    if let Some(noise) = options.noise_selector()? {
        let removed = strip_noise(&mut doc, &noise);
        ::log::debug!("Stripped {} noise nodes", removed);
    }

    let title = extract_title(&doc);
    let text = text::truncate_chars(&extract_text(&doc)?, options.max_text_chars);
    let links = extract_links(&doc);

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::debug!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    Ok(Extracted { title, text, links })
}

/// Detaches every element matching `noise` from the tree
///
/// Returns the number of subtrees removed. Nested matches inside an already
/// detached subtree are counted but detaching them again is harmless.
pub fn strip_noise(doc: &mut Html, noise: &Selector) -> usize {
    let ids = doc.select(noise).map(|el| el.id()).collect::<Vec<_>>();

    for id in &ids {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            node.detach();
        }
    }

    ids.len()
}

/// Text of the first `<title>` element, or [`NO_TITLE_FOUND`]
pub fn extract_title(doc: &Html) -> String {
    let title_selector = Selector::parse("title").unwrap();

    doc.select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE_FOUND.to_string())
}

/// Visible body text, one trimmed text node per line
pub fn extract_text(doc: &Html) -> Result<String, ParseError> {
    let body_selector = Selector::parse("body").unwrap();
    let body = doc
        .select(&body_selector)
        .next()
        .ok_or(ParseError::MissingBody)?;

    Ok(text::join_segments(body.text()))
}

/// Non-empty `href` values of every anchor, in document order
pub fn extract_links(doc: &Html) -> Vec<String> {
    let link_selector = Selector::parse("a").unwrap();

    doc.select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|s| s.to_string())
        .collect()
}
