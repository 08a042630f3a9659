//! Persisted output configuration.
//!
//! Settings are stored as one JSON object. Loading shallow-merges the
//! stored object over [`Settings::default`], so keys added in a later
//! version are backfilled and keys this version does not know about are
//! carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Built-in field keys in their default column order.
pub const DEFAULT_FIELD_ORDER: &[&str] = &[
    "title",
    "seriesName",
    "seriesNumber",
    "type",
    "pages",
    "personalRating",
    "goodreadsRating",
    "author",
    "narrator",
    "publishDate",
    "timesRead",
    "plan",
    "dateAdded",
    "recommendedBy",
    "link",
];

/// Default column separator: a tab, so the row pastes into separate cells.
pub const DEFAULT_SEPARATOR: &str = "\t";

/// How the author column renders a contributor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorFormat {
    /// `"Surname, Given"`.
    #[default]
    LastFirst,
    /// Unchanged. Unrecognized stored values also land here.
    #[serde(other)]
    Full,
}

/// How the published date column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateFormat {
    /// `"2006"`.
    YearOnly,
    /// `"2006-06-01"`, or the year alone when month or day is unknown.
    Iso,
    /// `"June 1, 2006"`.
    #[default]
    #[serde(other)]
    Full,
}

/// How the date added column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateAddedFormat {
    /// `"Jun 1, 2006"`.
    Us,
    /// `"2006-06-01"`.
    Iso,
    /// `"1 Jun 2006"`.
    #[default]
    #[serde(other)]
    Full,
}

/// A user-defined placeholder column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: String,
    pub label: String,
}

/// The full configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub field_order: Vec<String>,
    pub custom_empty_fields: Vec<CustomField>,
    pub separator: String,
    pub author_format: AuthorFormat,
    pub date_format: DateFormat,
    pub date_added_format: DateAddedFormat,
    /// Keys written by other versions; preserved, never read.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_order: DEFAULT_FIELD_ORDER.iter().map(|k| k.to_string()).collect(),
            custom_empty_fields: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            author_format: AuthorFormat::default(),
            date_format: DateFormat::default(),
            date_added_format: DateAddedFormat::default(),
            extra: Map::new(),
        }
    }
}

/// Keys of the settings object that this version understands.
pub const KNOWN_KEYS: &[&str] = &[
    "fieldOrder",
    "customEmptyFields",
    "separator",
    "authorFormat",
    "dateFormat",
    "dateAddedFormat",
];

impl Settings {
    /// Parse a stored blob, backfilling every missing key from defaults.
    ///
    /// Returns `None` when the blob is not a JSON object or a known key
    /// holds a value of the wrong shape.
    pub fn from_json_merged(blob: &str) -> Option<Self> {
        let stored: Value = serde_json::from_str(blob).ok()?;
        let Value::Object(stored) = stored else {
            return None;
        };
        let mut merged = Self::default().to_object();
        merged.extend(stored);
        serde_json::from_value(Value::Object(merged)).ok()
    }

    /// The settings as a JSON object, extra keys included.
    pub fn to_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Whether `id` names one of the custom placeholder columns.
    pub fn has_custom_field(&self, id: &str) -> bool {
        self.custom_empty_fields.iter().any(|f| f.id == id)
    }
}
