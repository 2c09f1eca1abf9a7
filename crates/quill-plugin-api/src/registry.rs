//! Registry of the languages available to the application

use crate::language::Language;
use quill_foundation::{QuillError, QuillResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Maps names and file extensions to language plugins
#[derive(Default)]
pub struct LanguageRegistry {
    languages: Vec<Arc<dyn Language>>,
    by_extension: HashMap<String, usize>,
}

impl std::fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.languages.iter().map(|l| l.name()))
            .finish()
    }
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language.
    ///
    /// Names must be unique ignoring case. An extension already claimed by
    /// an earlier language stays with that language.
    pub fn register(&mut self, language: Arc<dyn Language>) -> QuillResult<()> {
        if self.by_name(language.name()).is_some() {
            return Err(QuillError::config(format!(
                "Language '{}' is already registered",
                language.name()
            )));
        }

        let index = self.languages.len();
        for extension in language.file_extensions() {
            let key = normalize(extension);
            if let Some(existing) = self.by_extension.get(&key) {
                debug!(
                    extension = %key,
                    owner = self.languages[*existing].name(),
                    skipped = language.name(),
                    "Extension already registered"
                );
                continue;
            }
            self.by_extension.insert(key, index);
        }

        debug!(language = language.name(), "Registered language");
        self.languages.push(language);
        Ok(())
    }

    /// Language for an extension, with or without the leading dot
    pub fn by_extension(&self, extension: &str) -> Option<&Arc<dyn Language>> {
        self.by_extension
            .get(&normalize(extension))
            .map(|index| &self.languages[*index])
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<dyn Language>> {
        self.languages
            .iter()
            .find(|language| language.name().eq_ignore_ascii_case(name))
    }

    /// Language handling the file at `path`
    pub fn for_path(&self, path: &Path) -> Option<&Arc<dyn Language>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension(ext))
    }

    /// Languages in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Language>> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
