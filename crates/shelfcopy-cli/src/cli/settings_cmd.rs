//! `shelfcopy settings`: inspect and change the per-site row layout.

use crate::cli::output::{self, Styled};
use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;
use shelfcopy::{FieldRegistry, KeyValueStore, Settings, SettingsStore};

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Print one setting as JSON.
    Get { key: String },
    /// Set one setting. VALUE is JSON; bare words are taken as strings.
    Set { key: String, value: String },
    /// Restore the default settings.
    Reset,
    /// List every available field and whether it is in the row.
    Fields,
    /// Add an always-empty placeholder column.
    AddField {
        label: String,
        /// Zero-based column position (default: end of the row).
        #[arg(long)]
        position: Option<usize>,
    },
    /// Remove a placeholder column.
    RemoveField { id: String },
    /// Move a column by OFFSET positions (negative moves left).
    Move {
        key: String,
        #[arg(allow_hyphen_values = true)]
        offset: isize,
    },
}

/// Run a settings action against `store`.
pub fn run<S: KeyValueStore>(store: &mut SettingsStore<S>, action: SettingsAction) -> Result<()> {
    let s = Styled::new();
    match action {
        SettingsAction::Show => show(&s, store.settings()),
        SettingsAction::Get { key } => {
            let value = store.get(&key)?;
            output::print_json(&value);
        }
        SettingsAction::Set { key, value } => {
            let value = parse_value(&value);
            store
                .set(&key, value)
                .with_context(|| format!("failed to set `{key}`"))?;
            output::print_ok(&s, &format!("Updated {key}."));
        }
        SettingsAction::Reset => {
            store.reset()?;
            output::print_ok(&s, "Settings reset to defaults.");
        }
        SettingsAction::Fields => fields(&s, store.settings()),
        SettingsAction::AddField { label, position } => {
            let id = store.add_custom_empty_field(&label)?;
            let mut order = store.settings().field_order.clone();
            let at = position.unwrap_or(order.len()).min(order.len());
            order.insert(at, id.clone());
            store.set_field_order(order)?;
            if output::is_json() {
                output::print_json(&serde_json::json!({ "id": id, "position": at }));
            } else {
                println!("{id}");
                output::print_ok(&s, &format!("Added '{label}' at column {}.", at + 1));
            }
        }
        SettingsAction::RemoveField { id } => {
            store.remove_custom_empty_field(&id)?;
            output::print_ok(&s, &format!("Removed {id}."));
        }
        SettingsAction::Move { key, offset } => {
            let at = store.move_field(&key, offset)?;
            output::print_ok(&s, &format!("Moved {key} to column {}.", at + 1));
        }
    }
    Ok(())
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn show(s: &Styled, settings: &Settings) {
    if output::is_json() {
        output::print_json(&Value::Object(settings.to_object()));
        return;
    }

    let registry = FieldRegistry::from_settings(settings);
    println!("  {}", s.bold("Row"));
    for (i, key) in settings.field_order.iter().enumerate() {
        let label = registry
            .get(key)
            .map(|f| f.label.clone())
            .unwrap_or_else(|| s.dim("(unknown field, left empty)"));
        output::print_row(&format!("{:>2}. {key}", i + 1), &label);
    }
    println!();
    println!("  {}", s.bold("Format"));
    output::print_row("separator", &output::describe_separator(&settings.separator));
    output::print_row("authorFormat", &enum_name(&settings.author_format));
    output::print_row("dateFormat", &enum_name(&settings.date_format));
    output::print_row("dateAddedFormat", &enum_name(&settings.date_added_format));
}

fn fields(s: &Styled, settings: &Settings) {
    let registry = FieldRegistry::from_settings(settings);
    if output::is_json() {
        let list: Vec<Value> = registry
            .iter()
            .map(|f| {
                serde_json::json!({
                    "key": f.key,
                    "label": f.label,
                    "custom": f.is_custom(),
                    "inRow": settings.field_order.contains(&f.key),
                })
            })
            .collect();
        output::print_json(&Value::Array(list));
        return;
    }

    for field in registry.iter() {
        let mut label = field.label.clone();
        if field.is_custom() {
            label.push_str(&s.dim(" (custom)"));
        }
        if !settings.field_order.contains(&field.key) {
            label.push_str(&s.dim(" (hidden)"));
        }
        output::print_row(&field.key, &label);
    }
}

fn enum_name<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(name)) => name,
        _ => String::new(),
    }
}
