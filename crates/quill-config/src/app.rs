//! Application configuration
//!
//! Loaded once at startup and passed explicitly to the language plugins, so
//! install locations and launch templates never live in process globals.

use quill_foundation::{QuillError, QuillResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// The project whose workspace descriptors are generated
    #[serde(default)]
    pub project: ProjectConfig,
    /// Per-language install paths and templates, keyed by lowercase name
    #[serde(default)]
    pub languages: HashMap<String, LanguageConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Project identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Name written into project-identity descriptors
    pub name: String,
    /// Directory descriptor paths are made relative to
    pub root: PathBuf,
}

/// Install locations and overrides for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    /// Language server installation directory (`%server-path%`)
    pub server_install_path: Option<PathBuf>,
    /// Project template copied into fresh workspaces
    pub server_template_dir: Option<PathBuf>,
    /// Replaces the plugin's default server launch command
    pub launch: Option<Vec<String>>,
    /// Where option values are persisted
    pub settings_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "quill-project".to_string(),
            root: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Load configuration from the current directory and environment
    pub fn load() -> QuillResult<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration rooted at `dir`
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`QUILL__LOGGING__LEVEL=debug`, ...)
    /// 2. `quill.toml` or `.quill/config.toml` in `dir`
    /// 3. Default values
    pub fn load_from(dir: &Path) -> QuillResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for candidate in ["quill.toml", ".quill/config.toml"] {
            let path = dir.join(candidate);
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
                break;
            }
        }

        let config: AppConfig = figment
            .merge(Env::prefixed("QUILL__").split("__"))
            .extract()
            .map_err(|e| QuillError::config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Configuration for a language, defaulting when the section is absent
    pub fn language(&self, name: &str) -> LanguageConfig {
        self.languages
            .get(&name.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> QuillResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(QuillError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        for (name, language) in &self.languages {
            if matches!(&language.launch, Some(command) if command.is_empty()) {
                return Err(QuillError::config(format!(
                    "Launch command for language '{}' cannot be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.project.name, "quill-project");
        assert_eq!(config.language("java"), LanguageConfig::default());
    }

    #[test]
    fn test_loads_language_section() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("quill.toml"),
            r#"
[project]
name = "demo"
root = "/work/demo"

[languages.java]
serverInstallPath = "/opt/jdtls"
launch = ["jdtls", "-data", "%workspace%"]
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.project.name, "demo");
        let java = config.language("Java");
        assert_eq!(java.server_install_path, Some(PathBuf::from("/opt/jdtls")));
        assert_eq!(java.launch.unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_launch_rejected() {
        let mut config = AppConfig::default();
        config.languages.insert(
            "java".to_string(),
            LanguageConfig {
                launch: Some(Vec::new()),
                ..Default::default()
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("java"));
    }
}
