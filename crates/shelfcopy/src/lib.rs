//! Shelfcopy: turn a book catalog page into one spreadsheet row.
//!
//! The pipeline has three cooperating pieces:
//!
//! - [`registry::FieldRegistry`]: the ordered catalog of output fields
//!   (built-ins plus user-defined placeholder columns).
//! - [`store::SettingsStore`]: persisted [`settings::Settings`] with
//!   load / merge-defaults / save lifecycle over an injected
//!   [`store::KeyValueStore`].
//! - [`extractor::BookInfoExtractor`]: extract every raw value, format it
//!   per settings, and join the result in the configured order.
//!
//! Page access goes through the [`document::Document`] trait so the same
//! pipeline runs against saved HTML ([`document::HtmlDocument`]) or any
//! other source of selector queries.

pub mod clock;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fields;
pub mod links;
pub mod registry;
pub mod settings;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{Document, HtmlDocument};
pub use error::{DocumentError, ExtractError, FieldError, LinkError, SettingsError, StoreError};
pub use extractor::BookInfoExtractor;
pub use fields::{FieldDefinition, FieldKind, PublishDate, RawValue};
pub use registry::FieldRegistry;
pub use settings::{AuthorFormat, CustomField, DateAddedFormat, DateFormat, Settings};
pub use store::{FileStore, KeyValueStore, MemoryStore, SettingsStore};
