//! Read-only selector queries over a page.
//!
//! Field extractors never touch HTML directly; they ask a [`Document`] for
//! the trimmed text of the first element matching a CSS selector. This
//! keeps every extractor a pure read of the current page state.

use crate::error::DocumentError;
use scraper::{ElementRef, Html, Node, Selector};

/// Synchronous, side-effect-free page queries.
pub trait Document {
    /// URL the page was loaded from.
    fn url(&self) -> &str;

    /// Whitespace-normalized text of every element matching `selector`, in
    /// document order. Elements with no text are kept as empty strings.
    fn texts(&self, selector: &str) -> Result<Vec<String>, DocumentError>;

    /// Value of attribute `name` on the first element matching `selector`.
    fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DocumentError>;

    /// Text of the first child node of the first element matching `selector`.
    fn leading_text(&self, selector: &str) -> Result<Option<String>, DocumentError>;

    /// Text of the first matching element, or `None` when nothing matches
    /// or the match is blank.
    fn text(&self, selector: &str) -> Result<Option<String>, DocumentError> {
        Ok(self
            .texts(selector)?
            .into_iter()
            .next()
            .filter(|t| !t.is_empty()))
    }

    /// Try each selector in order and return the first non-blank text.
    fn first_text(&self, selectors: &[&str]) -> Result<Option<String>, DocumentError> {
        for selector in selectors {
            if let Some(text) = self.text(selector)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
    url: String,
}

impl HtmlDocument {
    /// Parse a full HTML document fetched from `url`.
    pub fn parse(html: &str, url: impl Into<String>) -> Self {
        Self {
            html: Html::parse_document(html),
            url: url.into(),
        }
    }

    fn select_first(&self, selector: &str) -> Result<Option<ElementRef<'_>>, DocumentError> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next())
    }
}

impl Document for HtmlDocument {
    fn url(&self) -> &str {
        &self.url
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>, DocumentError> {
        let sel = parse_selector(selector)?;
        Ok(self
            .html
            .select(&sel)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .collect())
    }

    fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DocumentError> {
        Ok(self
            .select_first(selector)?
            .and_then(|el| el.value().attr(name).map(str::to_string)))
    }

    fn leading_text(&self, selector: &str) -> Result<Option<String>, DocumentError> {
        let Some(el) = self.select_first(selector)? else {
            return Ok(None);
        };
        let Some(first) = el.children().next() else {
            return Ok(None);
        };
        let raw = match first.value() {
            Node::Text(text) => (**text).to_string(),
            Node::Element(_) => ElementRef::wrap(first)
                .map(|child| child.text().collect::<String>())
                .unwrap_or_default(),
            _ => String::new(),
        };
        let text = normalize_whitespace(&raw);
        Ok((!text.is_empty()).then_some(text))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|e| DocumentError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Collapse runs of whitespace (including tabs and newlines) to one space.
///
/// Page text ends up inside a separator-joined row, so embedded tabs or
/// line breaks must never survive.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
