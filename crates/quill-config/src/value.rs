//! Typed setting values

use crate::option::ValueKind;
use std::fmt;
use std::path::{Path, PathBuf};

/// Value stored for an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Path(PathBuf),
    Flag(bool),
}

impl SettingValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SettingValue::Text(_) => ValueKind::Text,
            SettingValue::Path(_) => ValueKind::Path,
            SettingValue::Flag(_) => ValueKind::Flag,
        }
    }

    /// Parse a raw string (CLI argument, settings file entry) as `kind`
    pub fn parse(kind: ValueKind, raw: &str) -> Option<Self> {
        match kind {
            ValueKind::Text => Some(SettingValue::Text(raw.to_string())),
            ValueKind::Path => Some(SettingValue::Path(PathBuf::from(raw))),
            ValueKind::Flag => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(SettingValue::Flag(true)),
                "false" | "no" | "off" | "0" => Some(SettingValue::Flag(false)),
                _ => None,
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            SettingValue::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(text) => f.write_str(text),
            SettingValue::Path(path) => write!(f, "{}", path.display()),
            SettingValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<PathBuf> for SettingValue {
    fn from(value: PathBuf) -> Self {
        SettingValue::Path(value)
    }
}

impl From<&Path> for SettingValue {
    fn from(value: &Path) -> Self {
        SettingValue::Path(value.to_path_buf())
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Flag(value)
    }
}

/// Conversion used by typed reads such as `store.get::<PathBuf>(option)`
pub trait FromSettingValue: Sized {
    const KIND: ValueKind;

    fn from_setting(value: &SettingValue) -> Option<Self>;
}

impl FromSettingValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn from_setting(value: &SettingValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromSettingValue for PathBuf {
    const KIND: ValueKind = ValueKind::Path;

    fn from_setting(value: &SettingValue) -> Option<Self> {
        value.as_path().map(Path::to_path_buf)
    }
}

impl FromSettingValue for bool {
    const KIND: ValueKind = ValueKind::Flag;

    fn from_setting(value: &SettingValue) -> Option<Self> {
        value.as_flag()
    }
}

impl FromSettingValue for SettingValue {
    // Never checked for this impl; any stored value converts.
    const KIND: ValueKind = ValueKind::Text;

    fn from_setting(value: &SettingValue) -> Option<Self> {
        Some(value.clone())
    }
}
