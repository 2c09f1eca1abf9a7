//! Registry construction and persisted settings

use anyhow::Context;
use quill_config::{AppConfig, SettingsFile};
use quill_lang_java::JavaLanguage;
use quill_lang_python::PythonLanguage;
use quill_plugin_api::{Language, LanguageRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Default settings location under the project root
const DEFAULT_SETTINGS_FILE: &str = ".quill/settings.toml";

/// Every built-in language, with its persisted settings applied
pub fn build_registry(config: &AppConfig) -> anyhow::Result<LanguageRegistry> {
    let languages: Vec<Arc<dyn Language>> = vec![
        Arc::new(JavaLanguage::new(config)?),
        Arc::new(PythonLanguage::new(config)?),
    ];

    let mut registry = LanguageRegistry::new();
    for language in languages {
        let file = settings_file(config, language.as_ref());
        let applied = file.load_into(language.settings()).with_context(|| {
            format!(
                "Failed to load {} settings from {}",
                language.name(),
                file.path().display()
            )
        })?;
        debug!(language = language.name(), applied, "Settings applied");
        registry.register(language)?;
    }
    Ok(registry)
}

/// Where a language's option values are persisted
pub fn settings_file(config: &AppConfig, language: &dyn Language) -> SettingsFile {
    let path = config
        .language(language.name())
        .settings_file
        .unwrap_or_else(|| config.project.root.join(DEFAULT_SETTINGS_FILE));
    SettingsFile::new(path)
}

/// Look a language up by name or file extension
pub fn find<'a>(
    registry: &'a LanguageRegistry,
    name: &str,
) -> anyhow::Result<&'a Arc<dyn Language>> {
    registry
        .by_name(name)
        .or_else(|| registry.by_extension(name))
        .with_context(|| {
            let known: Vec<&str> = registry.iter().map(|l| l.name()).collect();
            format!("Unknown language '{}' (known: {})", name, known.join(", "))
        })
}

/// Make `dir` absolute so launch templates and descriptors agree on it
pub fn absolute(dir: PathBuf) -> anyhow::Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(dir))
}
