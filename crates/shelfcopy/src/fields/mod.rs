//! Output fields: how each column is read from the page and rendered.
//!
//! Every column is a [`FieldDefinition`] whose [`FieldKind`] decides both
//! halves of its behavior:
//!
//! - **extract** reads a [`RawValue`] from a [`Document`] (or the clock).
//! - **format** turns that raw value into the final cell text using the
//!   current [`Settings`]; it never looks at the page.
//!
//! Both halves return `Result`, so one broken field can be logged and
//! blanked by the extractor without affecting its neighbours.

pub mod author;
pub mod dates;
pub mod pages;
pub mod series;

use crate::clock::Clock;
use crate::document::Document;
use crate::error::FieldError;
use crate::settings::Settings;
use chrono::{DateTime, Local};

pub use dates::PublishDate;

const TITLE_SELECTORS: &[&str] = &[
    "h1.Text__title1",
    "h1#bookTitle",
    r#"h1[data-testid="bookTitle"]"#,
];

const RATING_SELECTORS: &[&str] = &[
    ".RatingStatistics__rating",
    r#"[itemprop="ratingValue"]"#,
    "#bookMeta .average",
];

const AUTHOR_SELECTORS: &[&str] = &[
    ".ContributorLink__name",
    r#".authorName span[itemprop="name"]"#,
];

/// Default value of the reading plan column.
pub const PLAN_DEFAULT: &str = "99";

/// A value read from the page before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Date(PublishDate),
    Timestamp(DateTime<Local>),
}

impl RawValue {
    /// Wrap page text, mapping blank text to [`RawValue::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Unformatted rendering, used when a field's formatter fails.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Date(date) => date.to_string(),
            Self::Timestamp(ts) => ts.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Behavior of one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Title,
    SeriesName,
    SeriesNumber,
    Type,
    Pages,
    PersonalRating,
    GoodreadsRating,
    Author,
    Narrator,
    PublishDate,
    TimesRead,
    Plan,
    DateAdded,
    RecommendedBy,
    Link,
    /// A user-defined placeholder that is always empty.
    Custom,
}

impl FieldKind {
    /// All built-in kinds in default column order.
    pub const BUILT_IN: [FieldKind; 15] = [
        Self::Title,
        Self::SeriesName,
        Self::SeriesNumber,
        Self::Type,
        Self::Pages,
        Self::PersonalRating,
        Self::GoodreadsRating,
        Self::Author,
        Self::Narrator,
        Self::PublishDate,
        Self::TimesRead,
        Self::Plan,
        Self::DateAdded,
        Self::RecommendedBy,
        Self::Link,
    ];

    /// Stable settings key. `None` for custom fields, which carry their own id.
    pub fn key(self) -> Option<&'static str> {
        let key = match self {
            Self::Title => "title",
            Self::SeriesName => "seriesName",
            Self::SeriesNumber => "seriesNumber",
            Self::Type => "type",
            Self::Pages => "pages",
            Self::PersonalRating => "personalRating",
            Self::GoodreadsRating => "goodreadsRating",
            Self::Author => "author",
            Self::Narrator => "narrator",
            Self::PublishDate => "publishDate",
            Self::TimesRead => "timesRead",
            Self::Plan => "plan",
            Self::DateAdded => "dateAdded",
            Self::RecommendedBy => "recommendedBy",
            Self::Link => "link",
            Self::Custom => return None,
        };
        Some(key)
    }

    /// Column header shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::SeriesName => "Series Name",
            Self::SeriesNumber => "Series Number",
            Self::Type => "Type",
            Self::Pages => "Pages",
            Self::PersonalRating => "Personal Rating",
            Self::GoodreadsRating => "Goodreads Rating",
            Self::Author => "Author",
            Self::Narrator => "Narrator",
            Self::PublishDate => "Published Date",
            Self::TimesRead => "Times Read",
            Self::Plan => "Plan",
            Self::DateAdded => "Date Added",
            Self::RecommendedBy => "Recommended By",
            Self::Link => "Goodreads Link",
            Self::Custom => "Custom",
        }
    }

    /// Look up a built-in kind by settings key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::BUILT_IN.into_iter().find(|k| k.key() == Some(key))
    }
}

/// One entry in the field registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn built_in(kind: FieldKind) -> Self {
        Self {
            key: kind.key().unwrap_or_default().to_string(),
            label: kind.label().to_string(),
            kind,
        }
    }

    pub fn custom(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: id.into(),
            label: label.into(),
            kind: FieldKind::Custom,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.kind == FieldKind::Custom
    }

    /// Read this field's raw value from the page.
    pub fn extract(&self, doc: &dyn Document, clock: &dyn Clock) -> Result<RawValue, FieldError> {
        match self.kind {
            FieldKind::Title => Ok(RawValue::text(
                doc.first_text(TITLE_SELECTORS)?.unwrap_or_default(),
            )),
            FieldKind::SeriesName => {
                let (name, _) = series::extract_series(doc)?;
                Ok(RawValue::text(name))
            }
            FieldKind::SeriesNumber => {
                let (_, number) = series::extract_series(doc)?;
                Ok(RawValue::text(number))
            }
            FieldKind::Type => {
                // Derived independently from the page rather than from the
                // already-extracted pages column.
                let pages = pages::extract_pages(doc)?;
                Ok(RawValue::text(pages::classify(&pages)?))
            }
            FieldKind::Pages => Ok(RawValue::text(pages::extract_pages(doc)?)),
            FieldKind::GoodreadsRating => Ok(RawValue::text(
                doc.first_text(RATING_SELECTORS)?.unwrap_or_default(),
            )),
            FieldKind::Author => Ok(RawValue::text(
                doc.first_text(AUTHOR_SELECTORS)?.unwrap_or_default(),
            )),
            FieldKind::PublishDate => Ok(dates::extract_publish_date(doc)?
                .map(RawValue::Date)
                .unwrap_or(RawValue::Empty)),
            FieldKind::DateAdded => Ok(RawValue::Timestamp(clock.now())),
            FieldKind::Plan => Ok(RawValue::text(PLAN_DEFAULT)),
            FieldKind::Link => Ok(RawValue::text(doc.url())),
            FieldKind::PersonalRating
            | FieldKind::Narrator
            | FieldKind::TimesRead
            | FieldKind::RecommendedBy
            | FieldKind::Custom => Ok(RawValue::Empty),
        }
    }

    /// Render a raw value as cell text under `settings`.
    pub fn format(&self, raw: &RawValue, settings: &Settings) -> Result<String, FieldError> {
        match (self.kind, raw) {
            (_, RawValue::Empty) => Ok(String::new()),
            (FieldKind::Author, RawValue::Text(name)) => {
                Ok(author::format_author(name, settings.author_format))
            }
            (FieldKind::PublishDate, RawValue::Date(date)) => {
                dates::format_publish_date(date, settings.date_format)
            }
            (FieldKind::DateAdded, RawValue::Timestamp(ts)) => {
                Ok(dates::format_date_added(ts, settings.date_added_format))
            }
            (FieldKind::PublishDate | FieldKind::DateAdded, _) => Err(FieldError::UnexpectedValue {
                field: self.key.clone(),
                found: raw.kind_name(),
            }),
            (_, RawValue::Text(text)) => Ok(text.clone()),
            (_, other) => Err(FieldError::UnexpectedValue {
                field: self.key.clone(),
                found: other.kind_name(),
            }),
        }
    }
}
