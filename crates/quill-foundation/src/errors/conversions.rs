//! From implementations for standard library and parser types

use super::QuillError;

impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        QuillError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<toml::de::Error> for QuillError {
    fn from(err: toml::de::Error) -> Self {
        QuillError::Config {
            message: format!("Invalid TOML: {}", err),
        }
    }
}

impl From<toml::ser::Error> for QuillError {
    fn from(err: toml::ser::Error) -> Self {
        QuillError::Config {
            message: format!("Failed to serialize TOML: {}", err),
        }
    }
}
