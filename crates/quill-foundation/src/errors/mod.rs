//! Unified error type for Quill

mod conversions;

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the workspace
pub type QuillResult<T> = Result<T, QuillError>;

/// Errors raised by settings, templates, workspaces and builds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QuillError {
    /// A required option was read before it was given a value
    #[error("Missing required setting '{option}'")]
    MissingRequiredSetting { option: String },

    /// An optional setting was read as if it had a value
    #[error("Setting '{option}' has no value")]
    UnsetSetting { option: String },

    /// An option was looked up by an external name that no option declares
    #[error("Unknown option '{name}' for language {language}")]
    UnknownOptionName { language: String, name: String },

    /// A value of the wrong kind was stored or read
    #[error("Setting '{option}' expects a {expected} value, got {actual}")]
    SettingTypeMismatch {
        option: String,
        expected: String,
        actual: String,
    },

    /// A change callback tried to set the option it is being notified about
    #[error("Setting '{option}' was set again from inside its own change callback")]
    ReentrantSetting { option: String },

    /// Template unreadable or output unwritable during a render
    #[error("Failed to render template {template} into {output}: {source}")]
    TemplateIo {
        template: PathBuf,
        output: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A workspace file group could not be prepared
    #[error("Workspace setup failed for {group}: {message}")]
    WorkspaceSetup { group: String, message: String },

    /// Source discovery produced no result
    #[error("Indexing failed for {input}: {message}")]
    Indexing { input: PathBuf, message: String },

    /// Invalid application configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External process could not be started or failed
    #[error("Process error ({program}): {message}")]
    Process { program: String, message: String },

    /// Language does not offer the requested capability
    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },

    /// Filesystem error, optionally tied to a path
    #[error("I/O error{}: {message}", .path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl QuillError {
    pub fn missing_required(option: impl Into<String>) -> Self {
        Self::MissingRequiredSetting {
            option: option.into(),
        }
    }

    pub fn unset(option: impl Into<String>) -> Self {
        Self::UnsetSetting {
            option: option.into(),
        }
    }

    pub fn unknown_option(language: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownOptionName {
            language: language.into(),
            name: name.into(),
        }
    }

    pub fn type_mismatch(
        option: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::SettingTypeMismatch {
            option: option.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn workspace_setup(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WorkspaceSetup {
            group: group.into(),
            message: message.into(),
        }
    }

    pub fn indexing(input: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Indexing {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn process(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Process {
            program: program.into(),
            message: message.into(),
        }
    }

    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Whether the error means the configuration is unusable as-is.
    ///
    /// These propagate to the caller; everything else may be logged and
    /// swallowed at a component boundary.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredSetting { .. }
                | Self::UnsetSetting { .. }
                | Self::UnknownOptionName { .. }
                | Self::SettingTypeMismatch { .. }
                | Self::Config { .. }
        )
    }

    /// Short machine-friendly category for structured log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingRequiredSetting { .. } => "missing_required_setting",
            Self::UnsetSetting { .. } => "unset_setting",
            Self::UnknownOptionName { .. } => "unknown_option_name",
            Self::SettingTypeMismatch { .. } => "setting_type_mismatch",
            Self::ReentrantSetting { .. } => "reentrant_setting",
            Self::TemplateIo { .. } => "template_io",
            Self::WorkspaceSetup { .. } => "workspace_setup",
            Self::Indexing { .. } => "indexing",
            Self::Config { .. } => "config",
            Self::Process { .. } => "process",
            Self::NotSupported { .. } => "not_supported",
            Self::Io { .. } => "io",
        }
    }
}
