//! Page count extraction and length classification.

use crate::document::Document;
use crate::error::FieldError;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const PAGES_SELECTOR: &str = r#"p[data-testid="pagesFormat"]"#;

const DETAILS_SELECTORS: &[&str] = &[".BookDetails .BookDetails__list span", "#details .row"];

/// Longest book still counted as a short story.
pub const SHORT_STORY_MAX_PAGES: u32 = 40;
/// Longest book still counted as a novella.
pub const NOVELLA_MAX_PAGES: u32 = 300;

/// Page count as a digit string, or empty when the page lists none.
pub fn extract_pages(doc: &dyn Document) -> Result<String, FieldError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d[\d,]*)\s+pages").expect("pages regex is valid"));

    if let Some(text) = doc.text(PAGES_SELECTOR)? {
        if let Some(caps) = re.captures(&text) {
            return Ok(caps[1].replace(',', ""));
        }
    }

    for selector in DETAILS_SELECTORS {
        for text in doc.texts(selector)? {
            if !text.contains("pages") {
                continue;
            }
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            if !digits.is_empty() {
                debug!("page count from details fallback `{selector}`");
                return Ok(digits);
            }
        }
    }

    Ok(String::new())
}

/// Classify a book by length. An empty page count has no classification.
pub fn classify(pages: &str) -> Result<&'static str, FieldError> {
    if pages.is_empty() {
        return Ok("");
    }
    let count: u32 = pages.parse().map_err(|_| FieldError::Malformed {
        field: "type".to_string(),
        reason: format!("page count `{pages}` is not a number"),
    })?;

    Ok(if count <= SHORT_STORY_MAX_PAGES {
        "Short Story"
    } else if count <= NOVELLA_MAX_PAGES {
        "Novella"
    } else {
        "Novel"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify("40").unwrap(), "Short Story");
        assert_eq!(classify("41").unwrap(), "Novella");
        assert_eq!(classify("300").unwrap(), "Novella");
        assert_eq!(classify("301").unwrap(), "Novel");
        assert_eq!(classify("").unwrap(), "");
    }

    #[test]
    fn test_classify_rejects_garbage() {
        assert!(matches!(
            classify("many"),
            Err(FieldError::Malformed { .. })
        ));
    }

    #[test]
    fn test_pages_from_primary_element() {
        let doc = HtmlDocument::parse(
            r#"<p data-testid="pagesFormat">541 pages, Paperback</p>"#,
            "https://example.com/",
        );
        assert_eq!(extract_pages(&doc).unwrap(), "541");
    }

    #[test]
    fn test_pages_with_thousands_separator() {
        let doc = HtmlDocument::parse(
            r#"<p data-testid="pagesFormat">1,007 pages, Hardcover</p>"#,
            "https://example.com/",
        );
        let pages = extract_pages(&doc).unwrap();
        assert_eq!(pages, "1007");
        assert_eq!(classify(&pages).unwrap(), "Novel");
    }

    #[test]
    fn test_pages_from_details_fallback() {
        let doc = HtmlDocument::parse(
            r#"<div class="BookDetails"><div class="BookDetails__list">
                 <span>Hardcover</span><span>1,007 pages</span>
               </div></div>"#,
            "https://example.com/",
        );
        assert_eq!(extract_pages(&doc).unwrap(), "1007");
    }

    #[test]
    fn test_pages_absent() {
        let doc = HtmlDocument::parse("<p>Kindle Edition</p>", "https://example.com/");
        assert_eq!(extract_pages(&doc).unwrap(), "");
    }
}
