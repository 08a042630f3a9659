//! The catalog of fields available for output.

use crate::fields::{FieldDefinition, FieldKind};
use crate::settings::Settings;
use std::collections::HashMap;
use tracing::warn;

/// Built-in fields in default column order, followed by one placeholder
/// per custom field in the settings.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    /// Project the current settings into the full field set.
    ///
    /// A custom id that collides with a built-in key or an earlier custom
    /// id is skipped; the first definition of a key wins.
    pub fn from_settings(settings: &Settings) -> Self {
        let built_ins = FieldKind::BUILT_IN.into_iter().map(FieldDefinition::built_in);
        let customs = settings
            .custom_empty_fields
            .iter()
            .map(|c| FieldDefinition::custom(&c.id, &c.label));

        let mut fields = Vec::new();
        let mut index = HashMap::new();
        for field in built_ins.chain(customs) {
            if index.contains_key(&field.key) {
                warn!("skipping duplicate field key `{}`", field.key);
                continue;
            }
            index.insert(field.key.clone(), fields.len());
            fields.push(field);
        }

        Self { fields, index }
    }

    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    /// Every definition in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Whether `key` is reserved by a built-in field.
pub fn is_built_in_key(key: &str) -> bool {
    FieldKind::from_key(key).is_some()
}
