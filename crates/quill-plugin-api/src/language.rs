//! The language plugin trait

use crate::build::{CompilationResult, ExecuteMode, OutputSinks, SourceUnit};
use quill_config::DynSettings;
use quill_foundation::QuillResult;
use quill_lsp::ServerWrapper;
use std::path::PathBuf;

/// Capability flags of a language plugin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageCapabilities {
    /// Ships a language server
    pub language_server: bool,
    /// Needs a separately installed runtime
    pub runtime: bool,
    /// Runs sources directly instead of compiling them
    pub interpreted: bool,
}

impl LanguageCapabilities {
    pub const fn none() -> Self {
        Self {
            language_server: false,
            runtime: false,
            interpreted: false,
        }
    }

    pub const fn with_language_server(mut self) -> Self {
        self.language_server = true;
        self
    }

    pub const fn with_runtime(mut self) -> Self {
        self.runtime = true;
        self
    }

    pub const fn interpreted(mut self) -> Self {
        self.interpreted = true;
        self
    }
}

/// A supported programming language.
///
/// Constructed once at startup and kept for the lifetime of the
/// application.
pub trait Language: Send + Sync {
    /// Display name, e.g. "Java"
    fn name(&self) -> &'static str;

    /// Recognized extensions without the leading dot
    fn file_extensions(&self) -> &'static [&'static str];

    fn capabilities(&self) -> LanguageCapabilities;

    /// The language's settings, addressed by option name
    fn settings(&self) -> &dyn DynSettings;

    /// Name of the option holding the source directory
    fn input_option(&self) -> &'static str;

    fn input_location(&self) -> Option<PathBuf> {
        self.settings()
            .get_by_name(self.input_option())
            .ok()
            .flatten()
            .and_then(|value| value.as_path().map(PathBuf::from))
    }

    /// File receiving program output, if configured
    fn program_output(&self) -> Option<PathBuf>;

    /// File receiving compiler diagnostics, if configured
    fn compiler_output(&self) -> Option<PathBuf>;

    /// Where to get the runtime when [`LanguageCapabilities::runtime`] is set
    fn runtime_download_link(&self) -> Option<&'static str> {
        None
    }

    /// Source units under the input location; `None` on failure
    fn index_files(&self) -> Option<Vec<SourceUnit>>;

    /// Index, compile and optionally run the configured sources
    fn compile_and_execute(
        &self,
        mode: ExecuteMode,
        sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult>;

    /// The language server, when the language has one
    fn server(&self) -> Option<&ServerWrapper> {
        None
    }
}
