//! Error types for the extraction pipeline.

use thiserror::Error;

/// Failure to query the page.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Failure inside a single field's extract or format step.
///
/// These never escape the extractor; they are logged and the field
/// degrades to an empty column.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("field `{field}` cannot format a {found} value")]
    UnexpectedValue { field: String, found: &'static str },

    #[error("field `{field}`: {reason}")]
    Malformed { field: String, reason: String },
}

/// Failure of the whole extraction, surfaced to the user.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not find the book title on {url}")]
    MissingTitle { url: String },
}

/// Persistence backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Invalid settings access or mutation.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("no custom field with id `{0}`")]
    UnknownCustomField(String),

    #[error("no field `{0}` in the field order")]
    NotInOrder(String),

    #[error("failed to persist settings: {0}")]
    Store(#[from] StoreError),
}

/// Failure to build a cross-site link.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("could not find book information on the page")]
    MissingBookInfo,

    #[error("could not find a TMDB id on the page")]
    MissingTmdbId,

    #[error("invalid base URL `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
