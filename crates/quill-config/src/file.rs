//! Persistent per-language settings
//!
//! Stored as TOML, one table per language keyed by the lowercase language
//! name, entries keyed by option external name:
//!
//! ```toml
//! [java]
//! inputDirectory = "src"
//! execute = true
//! ```

use crate::dynamic::DynSettings;
use crate::value::SettingValue;
use quill_foundation::{QuillError, QuillResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings file on disk
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply the language's table to `settings`. A missing file or table is
    /// not an error. Returns the number of values applied.
    pub fn load_into(&self, settings: &dyn DynSettings) -> QuillResult<usize> {
        let table = self.read_table()?;
        let section = table_key(settings.language());

        let Some(entries) = table.get(&section) else {
            debug!(path = %self.path.display(), section = %section, "No settings section");
            return Ok(0);
        };
        let entries = entries.as_table().ok_or_else(|| {
            QuillError::config(format!(
                "[{}] in {} must be a table",
                section,
                self.path.display()
            ))
        })?;

        for (name, value) in entries {
            let raw = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    return Err(QuillError::config(format!(
                        "Setting '{}' in {} must be a string or boolean, got {}",
                        name,
                        self.path.display(),
                        other.type_str()
                    )))
                }
            };
            settings.set_by_name(name, &raw)?;
        }

        info!(
            path = %self.path.display(),
            language = settings.language(),
            count = entries.len(),
            "Loaded settings"
        );
        Ok(entries.len())
    }

    /// Write the language's current values, keeping other languages' tables
    pub fn save_from(&self, settings: &dyn DynSettings) -> QuillResult<()> {
        let mut table = self.read_table()?;

        let mut section = toml::Table::new();
        for option in settings.options() {
            if let Some(value) = option.value {
                let value = match value {
                    SettingValue::Flag(flag) => toml::Value::Boolean(flag),
                    other => toml::Value::String(other.to_string()),
                };
                section.insert(option.name.to_string(), value);
            }
        }
        table.insert(table_key(settings.language()), toml::Value::Table(section));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| QuillError::io_at(parent, e))?;
        }
        let content = toml::to_string_pretty(&table)?;
        std::fs::write(&self.path, content).map_err(|e| QuillError::io_at(&self.path, e))?;

        debug!(path = %self.path.display(), language = settings.language(), "Saved settings");
        Ok(())
    }

    fn read_table(&self) -> QuillResult<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| QuillError::io_at(&self.path, e))?;
        Ok(content.parse::<toml::Table>()?)
    }
}

fn table_key(language: &str) -> String {
    language.to_ascii_lowercase()
}
