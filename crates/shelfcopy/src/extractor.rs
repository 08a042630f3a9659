//! The extract → format → join pipeline.

use crate::clock::{Clock, SystemClock};
use crate::document::Document;
use crate::error::ExtractError;
use crate::fields::{FieldKind, RawValue};
use crate::registry::FieldRegistry;
use crate::settings::Settings;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Raw value per field key for one extraction run.
pub type ExtractionResult = HashMap<String, RawValue>;

/// Formatted cell text per field key.
pub type FormattedFields = HashMap<String, String>;

/// One output column, in configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: String,
    /// Empty for keys the registry does not know.
    pub label: String,
    pub value: String,
}

/// Builds a spreadsheet row from one page under one settings snapshot.
///
/// Holds no state of its own: every call re-reads the page, so repeated
/// calls against an unchanged page give the same row (apart from the
/// date added column).
pub struct BookInfoExtractor<'a> {
    doc: &'a dyn Document,
    settings: &'a Settings,
    clock: &'a dyn Clock,
}

impl<'a> BookInfoExtractor<'a> {
    pub fn new(doc: &'a dyn Document, settings: &'a Settings) -> Self {
        Self {
            doc,
            settings,
            clock: &SystemClock,
        }
    }

    /// Use `clock` for the date added column.
    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> FieldRegistry {
        FieldRegistry::from_settings(self.settings)
    }

    /// Run every field's extractor once. A failing field becomes empty.
    pub fn extract(&self) -> ExtractionResult {
        self.extract_with(&self.registry())
    }

    /// Run every field's formatter. A failing field falls back to its
    /// unformatted raw value.
    pub fn format(&self, raw: &ExtractionResult) -> FormattedFields {
        self.format_with(&self.registry(), raw)
    }

    /// Project `formatted` through the field order and join with the
    /// separator. Unknown keys produce empty columns in place.
    pub fn build_output(&self, formatted: &FormattedFields) -> String {
        self.settings
            .field_order
            .iter()
            .map(|key| formatted.get(key).map(String::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(&self.settings.separator)
    }

    /// Extract, format and join: the copy-ready row.
    ///
    /// Fails only when the page has no title, which means it is not a
    /// book page at all.
    pub fn get_book_info(&self) -> Result<String, ExtractError> {
        let formatted = self.formatted()?;
        let row = self.build_output(&formatted);
        info!("extracted book info from {}", self.doc.url());
        Ok(row)
    }

    /// The row as labelled columns, in configured order.
    pub fn columns(&self) -> Result<Vec<Column>, ExtractError> {
        let registry = self.registry();
        let formatted = self.formatted()?;
        Ok(self
            .settings
            .field_order
            .iter()
            .map(|key| Column {
                key: key.clone(),
                label: registry
                    .get(key)
                    .map(|f| f.label.clone())
                    .unwrap_or_default(),
                value: formatted.get(key).cloned().unwrap_or_default(),
            })
            .collect())
    }

    fn formatted(&self) -> Result<FormattedFields, ExtractError> {
        let registry = self.registry();
        let raw = self.extract_with(&registry);

        let title_key = FieldKind::Title.key().unwrap_or_default();
        if matches!(raw.get(title_key), None | Some(RawValue::Empty)) {
            return Err(ExtractError::MissingTitle {
                url: self.doc.url().to_string(),
            });
        }

        Ok(self.format_with(&registry, &raw))
    }

    fn extract_with(&self, registry: &FieldRegistry) -> ExtractionResult {
        registry
            .iter()
            .map(|field| {
                let value = field.extract(self.doc, self.clock).unwrap_or_else(|e| {
                    warn!("extracting `{}` failed: {e}", field.key);
                    RawValue::Empty
                });
                if value == RawValue::Empty && !field.is_custom() {
                    debug!("field `{}` is empty", field.key);
                }
                (field.key.clone(), value)
            })
            .collect()
    }

    fn format_with(&self, registry: &FieldRegistry, raw: &ExtractionResult) -> FormattedFields {
        registry
            .iter()
            .map(|field| {
                let value = raw.get(&field.key).unwrap_or(&RawValue::Empty);
                let text = field.format(value, self.settings).unwrap_or_else(|e| {
                    warn!("formatting `{}` failed: {e}", field.key);
                    value.to_plain_string()
                });
                (field.key.clone(), text)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::document::{Document, HtmlDocument};
    use crate::error::DocumentError;
    use crate::fields::PublishDate;
    use crate::settings::{CustomField, DateFormat};
    use chrono::{Local, TimeZone};

    const PAGE: &str = r#"
        <h1 class="Text__title1">The Final Empire</h1>
        <h3 class="Text__title3"><a>Mistborn #1</a></h3>
        <p data-testid="pagesFormat">541 pages, Paperback</p>
        <div class="RatingStatistics__rating">4.48</div>
        <span class="ContributorLink__name">Brandon Sanderson</span>
        <p data-testid="publicationInfo">First published July 17, 2006</p>
    "#;

    const URL: &str = "https://www.goodreads.com/book/show/68428.The_Final_Empire";

    fn clock() -> FixedClock {
        FixedClock(Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_default_row() {
        let doc = HtmlDocument::parse(PAGE, URL);
        let settings = Settings::default();
        let clock = clock();
        let row = BookInfoExtractor::new(&doc, &settings)
            .with_clock(&clock)
            .get_book_info()
            .unwrap();
        let expected = [
            "The Final Empire",
            "Mistborn",
            "1",
            "Novel",
            "541",
            "",
            "4.48",
            "Sanderson, Brandon",
            "",
            "July 17, 2006",
            "",
            "99",
            "9 Mar 2024",
            "",
            URL,
        ]
        .join("\t");
        assert_eq!(row, expected);
    }

    #[test]
    fn test_unknown_keys_keep_column_positions() {
        let doc = HtmlDocument::parse(PAGE, URL);
        let mut settings = Settings::default();
        settings.field_order = vec!["title".into(), "gone".into(), "pages".into()];
        settings.separator = "|".into();
        let row = BookInfoExtractor::new(&doc, &settings).get_book_info().unwrap();
        assert_eq!(row, "The Final Empire||541");
    }

    #[test]
    fn test_missing_title_is_total_failure() {
        let doc = HtmlDocument::parse("<p>404</p>", URL);
        let settings = Settings::default();
        let err = BookInfoExtractor::new(&doc, &settings)
            .get_book_info()
            .unwrap_err();
        assert!(matches!(err, ExtractError::MissingTitle { .. }));
    }

    #[test]
    fn test_format_failure_falls_back_to_raw() {
        let doc = HtmlDocument::parse(PAGE, URL);
        let mut settings = Settings::default();
        settings.date_format = DateFormat::Iso;
        let extractor = BookInfoExtractor::new(&doc, &settings);
        let mut raw = ExtractionResult::new();
        raw.insert(
            "publishDate".into(),
            RawValue::Date(PublishDate::full("February", "30", "2006")),
        );
        let formatted = extractor.format(&raw);
        assert_eq!(formatted["publishDate"], "February 30, 2006");
        assert_eq!(formatted["title"], "");
    }

    /// Page whose rating element cannot be queried.
    struct BrokenRating(HtmlDocument);

    impl BrokenRating {
        fn check(selector: &str) -> Result<(), DocumentError> {
            if selector.contains("RatingStatistics") {
                return Err(DocumentError::Selector {
                    selector: selector.to_string(),
                    reason: "unsupported".to_string(),
                });
            }
            Ok(())
        }
    }

    impl Document for BrokenRating {
        fn url(&self) -> &str {
            self.0.url()
        }

        fn texts(&self, selector: &str) -> Result<Vec<String>, DocumentError> {
            Self::check(selector)?;
            self.0.texts(selector)
        }

        fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DocumentError> {
            Self::check(selector)?;
            self.0.attr(selector, name)
        }

        fn leading_text(&self, selector: &str) -> Result<Option<String>, DocumentError> {
            Self::check(selector)?;
            self.0.leading_text(selector)
        }
    }

    #[test]
    fn test_extract_failure_blanks_only_that_field() {
        let doc = BrokenRating(HtmlDocument::parse(PAGE, URL));
        let settings = Settings::default();
        let clock = clock();
        let extractor = BookInfoExtractor::new(&doc, &settings).with_clock(&clock);

        let raw = extractor.extract();
        assert_eq!(raw["goodreadsRating"], RawValue::Empty);

        let formatted = extractor.format(&raw);
        assert_eq!(formatted["goodreadsRating"], "");
        assert_eq!(formatted["title"], "The Final Empire");
        assert_eq!(formatted["seriesName"], "Mistborn");
        assert_eq!(formatted["pages"], "541");
        assert_eq!(formatted["author"], "Sanderson, Brandon");
        assert_eq!(formatted["publishDate"], "July 17, 2006");
        assert_eq!(formatted["dateAdded"], "9 Mar 2024");
        assert_eq!(extractor.get_book_info().unwrap().split('\t').count(), 15);
    }

    #[test]
    fn test_custom_field_column_is_empty() {
        let doc = HtmlDocument::parse(PAGE, URL);
        let mut settings = Settings::default();
        settings.custom_empty_fields.push(CustomField {
            id: "custom_1".into(),
            label: "Shelf".into(),
        });
        settings.field_order = vec!["title".into(), "custom_1".into(), "plan".into()];
        let extractor = BookInfoExtractor::new(&doc, &settings);
        assert_eq!(extractor.get_book_info().unwrap(), "The Final Empire\t\t99");

        let columns = extractor.columns().unwrap();
        assert_eq!(columns[1].label, "Shelf");
        assert_eq!(columns[1].value, "");
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let doc = HtmlDocument::parse(PAGE, URL);
        let settings = Settings::default();
        let clock = clock();
        let extractor = BookInfoExtractor::new(&doc, &settings).with_clock(&clock);
        assert_eq!(
            extractor.get_book_info().unwrap(),
            extractor.get_book_info().unwrap()
        );
    }
}
