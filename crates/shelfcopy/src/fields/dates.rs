//! Publication date parsing and date rendering.

use crate::document::Document;
use crate::error::FieldError;
use crate::settings::{DateAddedFormat, DateFormat};
use chrono::{DateTime, Local, Month, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

const PUBLICATION_SELECTOR: &str = r#"p[data-testid="publicationInfo"]"#;
const DETAILS_ROW_SELECTOR: &str = "#details .row";

/// A publication date as printed on the page. Month and day are both
/// present or both absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDate {
    /// Full English month name, canonically capitalized.
    pub month: Option<String>,
    pub day: Option<String>,
    pub year: String,
}

impl PublishDate {
    pub fn year_only(year: impl Into<String>) -> Self {
        Self {
            month: None,
            day: None,
            year: year.into(),
        }
    }

    pub fn full(month: impl Into<String>, day: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            day: Some(day.into()),
            year: year.into(),
        }
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.month, &self.day) {
            (Some(month), Some(day)) => write!(f, "{month} {day}, {}", self.year),
            _ => f.write_str(&self.year),
        }
    }
}

/// Find the publication date on the page, preferring the publication info
/// line and falling back to the legacy details rows.
pub fn extract_publish_date(doc: &dyn Document) -> Result<Option<PublishDate>, FieldError> {
    if let Some(text) = doc.text(PUBLICATION_SELECTOR)? {
        if let Some(date) = parse_publication(&text) {
            return Ok(Some(date));
        }
    }

    for row in doc.texts(DETAILS_ROW_SELECTOR)? {
        if let Some(date) = parse_publication(&row) {
            debug!("publication date from details row");
            return Ok(Some(date));
        }
    }

    Ok(None)
}

/// Parse `"First published June 1st, 2006"` or `"Published 2006"`.
pub fn parse_publication(text: &str) -> Option<PublishDate> {
    static FULL_RE: OnceLock<Regex> = OnceLock::new();
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    let full_re = FULL_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:first\s+)?published\s+(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})",
        )
        .expect("full publication regex is valid")
    });
    let year_re = YEAR_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:first\s+)?published\s+(\d{4})").expect("year publication regex is valid")
    });

    if let Some(caps) = full_re.captures(text) {
        let month = caps[1]
            .parse::<Month>()
            .map(|m| m.name().to_string())
            .unwrap_or_else(|_| caps[1].to_string());
        return Some(PublishDate::full(month, &caps[2], &caps[3]));
    }

    year_re
        .captures(text)
        .map(|caps| PublishDate::year_only(&caps[1]))
}

/// Render a publication date.
pub fn format_publish_date(date: &PublishDate, format: DateFormat) -> Result<String, FieldError> {
    match format {
        DateFormat::Full => Ok(date.to_string()),
        DateFormat::YearOnly => Ok(date.year.clone()),
        DateFormat::Iso => match (&date.month, &date.day) {
            (Some(month), Some(day)) => iso_date(month, day, &date.year),
            _ => Ok(date.year.clone()),
        },
    }
}

fn iso_date(month: &str, day: &str, year: &str) -> Result<String, FieldError> {
    let malformed = |reason: String| FieldError::Malformed {
        field: "publishDate".to_string(),
        reason,
    };
    let month = month
        .parse::<Month>()
        .map_err(|_| malformed(format!("unknown month `{month}`")))?;
    let day: u32 = day
        .parse()
        .map_err(|_| malformed(format!("bad day `{day}`")))?;
    let year: i32 = year
        .parse()
        .map_err(|_| malformed(format!("bad year `{year}`")))?;
    let date = NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
        .ok_or_else(|| malformed(format!("{} {day}, {year} is not a date", month.name())))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Render the moment a row was copied.
pub fn format_date_added(ts: &DateTime<Local>, format: DateAddedFormat) -> String {
    let pattern = match format {
        DateAddedFormat::Full => "%-d %b %Y",
        DateAddedFormat::Us => "%b %-d, %Y",
        DateAddedFormat::Iso => "%Y-%m-%d",
    };
    ts.format(pattern).to_string()
}
