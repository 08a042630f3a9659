//! Persistence: key-value backends and the settings store built on them.
//!
//! Values are JSON strings keyed by name, the same shape a userscript
//! manager's per-site value storage offers. Settings live under
//! [`SETTINGS_KEY`].

use crate::error::{SettingsError, StoreError};
use crate::registry::is_built_in_key;
use crate::settings::{CustomField, Settings, KNOWN_KEYS};
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key under which the settings object is persisted.
pub const SETTINGS_KEY: &str = "settings";

/// String-valued persistent storage scoped to one site.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Stored value, or `default` when absent or unreadable.
    fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!("reading `{key}` failed, using default: {e}");
                default.to_string()
            }
        }
    }
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON file holding one object of string values.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use `path` as the backing file. It is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store for one site origin under `dir`.
    pub fn for_origin(dir: &Path, origin: &str) -> Self {
        let name: String = origin
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        Self::open(dir.join(format!("{name}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StoreError::Serde(e)) => {
                warn!("{} is unreadable, replacing it: {e}", self.path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("wrote `{key}` to {}", self.path.display());
        Ok(())
    }
}

/// Owns the live [`Settings`] and writes every change straight through to
/// the backend.
///
/// Mutators apply the change in memory first. When persisting fails they
/// return [`SettingsError::Store`] but the in-memory settings keep the
/// change, so the current session stays usable.
pub struct SettingsStore<S> {
    backend: S,
    settings: Settings,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Wrap `backend` and load whatever settings it holds.
    pub fn open(backend: S) -> Self {
        let settings = read_settings(&backend);
        Self { backend, settings }
    }

    /// Re-read settings from the backend. Absent or unreadable settings
    /// yield defaults; stored settings are merged over defaults.
    pub fn load(&mut self) -> &Settings {
        self.settings = read_settings(&self.backend);
        &self.settings
    }

    /// Persist the current settings. Never fails loudly.
    pub fn save(&mut self) -> bool {
        match self.persist() {
            Ok(()) => true,
            Err(e) => {
                warn!("saving settings failed: {e}");
                false
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Current value of one settings key, extra keys included.
    pub fn get(&self, key: &str) -> Result<Value, SettingsError> {
        self.settings
            .to_object()
            .remove(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))
    }

    /// Replace one known settings key and persist.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        let mut object: Map<String, Value> = self.settings.to_object();
        object.insert(key.to_string(), value);
        let mut updated: Settings =
            serde_json::from_value(Value::Object(object)).map_err(|e| SettingsError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        validate_custom_fields(&updated.custom_empty_fields)?;
        dedupe_order(&mut updated.field_order);

        self.settings = updated;
        self.persist()?;
        Ok(())
    }

    /// Apply a typed change and persist.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        change(&mut self.settings);
        dedupe_order(&mut self.settings.field_order);
        self.persist()?;
        Ok(())
    }

    /// Restore defaults and persist.
    pub fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        self.persist()?;
        Ok(())
    }

    /// Register a new placeholder column and return its id.
    ///
    /// The id is not added to the field order; callers decide where the
    /// column goes.
    pub fn add_custom_empty_field(&mut self, label: &str) -> Result<String, SettingsError> {
        let id = self.fresh_custom_id();
        self.settings.custom_empty_fields.push(CustomField {
            id: id.clone(),
            label: label.trim().to_string(),
        });
        self.persist()?;
        Ok(id)
    }

    /// Drop a placeholder column from both the custom list and the order.
    pub fn remove_custom_empty_field(&mut self, id: &str) -> Result<(), SettingsError> {
        if !self.settings.has_custom_field(id) {
            return Err(SettingsError::UnknownCustomField(id.to_string()));
        }
        self.settings.custom_empty_fields.retain(|f| f.id != id);
        self.settings.field_order.retain(|k| k != id);
        self.persist()?;
        Ok(())
    }

    /// Replace the column order, keeping only the first occurrence of a key.
    pub fn set_field_order(&mut self, order: Vec<String>) -> Result<(), SettingsError> {
        self.update(|settings| settings.field_order = order)
    }

    /// Shift `key` by `offset` positions within the order, clamped to the
    /// ends. Returns the new index.
    pub fn move_field(&mut self, key: &str, offset: isize) -> Result<usize, SettingsError> {
        let order = &mut self.settings.field_order;
        let from = order
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| SettingsError::NotInOrder(key.to_string()))?;
        let last = order.len().saturating_sub(1) as isize;
        let to = (from as isize + offset).clamp(0, last) as usize;
        let moved = order.remove(from);
        order.insert(to, moved);
        self.persist()?;
        Ok(to)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&self.settings)?;
        self.backend.set(SETTINGS_KEY, &blob)
    }

    fn fresh_custom_id(&self) -> String {
        let taken: HashSet<&str> = self
            .settings
            .custom_empty_fields
            .iter()
            .map(|f| f.id.as_str())
            .chain(self.settings.field_order.iter().map(String::as_str))
            .collect();
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let id = format!("custom_{stamp}");
            if !taken.contains(id.as_str()) {
                return id;
            }
            stamp += 1;
        }
    }
}

fn read_settings<S: KeyValueStore>(backend: &S) -> Settings {
    let blob = match backend.get(SETTINGS_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Settings::default(),
        Err(e) => {
            warn!("reading settings failed, using defaults: {e}");
            return Settings::default();
        }
    };
    Settings::from_json_merged(&blob).unwrap_or_else(|| {
        warn!("stored settings are unreadable, using defaults");
        Settings::default()
    })
}

fn validate_custom_fields(fields: &[CustomField]) -> Result<(), SettingsError> {
    let mut seen = HashSet::new();
    for field in fields {
        if is_built_in_key(&field.id) || !seen.insert(field.id.as_str()) {
            return Err(SettingsError::InvalidValue {
                key: "customEmptyFields".to_string(),
                reason: format!("id `{}` is already in use", field.id),
            });
        }
    }
    Ok(())
}

fn dedupe_order(order: &mut Vec<String>) {
    let mut seen = HashSet::new();
    order.retain(|k| seen.insert(k.clone()));
}
