//! Series name / position parsing.

use crate::document::Document;
use crate::error::FieldError;
use regex::Regex;
use std::sync::OnceLock;

const SERIES_SELECTORS: &[&str] = &[
    ".BookPageTitleSection h3.Text__title3 a",
    r#"h3.Text__title3 a[href*="/series/"]"#,
    "#bookSeries a",
    r#"h3.Text__title3 a:not([href*="/author/"])"#,
];

/// Read the series link and split it into `(name, number)`.
///
/// Both halves are empty when the page has no series link.
pub fn extract_series(doc: &dyn Document) -> Result<(String, String), FieldError> {
    let text = doc.first_text(SERIES_SELECTORS)?.unwrap_or_default();
    Ok(split_series(&text))
}

/// Split `"Mistborn #1"` into `("Mistborn", "1")`.
///
/// The trailing position may be `#`-prefixed, a range (`1-3`) or a
/// decimal (`0.5`). Text without a trailing position is all name. The
/// legacy layout wraps the whole link in parentheses; those are dropped.
pub fn split_series(text: &str) -> (String, String) {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\s*(?:#\s*)?(\d+(?:-\d+)?(?:\.\d+)?)\s*$").expect("series regex is valid")
    });

    let text = text.trim();
    let text = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text)
        .trim();

    match re.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(text.len(), |m| m.start());
            let number = caps.get(1).map_or("", |m| m.as_str());
            let name = text[..whole].trim_end().trim_end_matches(',').trim_end();
            (name.to_string(), number.to_string())
        }
        None => (text.to_string(), String::new()),
    }
}
