//! Build orchestrator

use crate::libraries::collect_libraries;
use quill_config::{FromSettingValue, SettingOption, SettingsStore};
use quill_foundation::{QuillError, QuillResult};
use quill_plugin_api::{
    BuildRequest, CompilationResult, CompilationStatus, ExecuteMode, OutputSinks, SourceIndexer,
    SourceUnit, Toolchain,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Which of a language's options play which role in a build
#[derive(Debug, Clone, Copy)]
pub struct BuildOptionSet<O> {
    /// Source directory handed to the indexer
    pub input_directory: O,
    pub compiled_output: O,
    pub package_target: Option<O>,
    pub entry_point: Option<O>,
    pub library_location: Option<O>,
    pub other_location: Option<O>,
    /// Flag consulted for [`ExecuteMode::UseConfigured`]
    pub execute: O,
}

/// Turns settings into a build request and delegates to a toolchain
pub struct BuildOrchestrator<O: SettingOption> {
    settings: Arc<SettingsStore<O>>,
    options: BuildOptionSet<O>,
    toolchain: Arc<dyn Toolchain>,
    indexer: Arc<dyn SourceIndexer>,
    library_extension: String,
}

impl<O: SettingOption> std::fmt::Debug for BuildOrchestrator<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrchestrator")
            .field("language", &O::LANGUAGE)
            .field("toolchain", &self.toolchain.name())
            .field("library_extension", &self.library_extension)
            .finish_non_exhaustive()
    }
}

impl<O: SettingOption> BuildOrchestrator<O> {
    pub fn new(
        settings: Arc<SettingsStore<O>>,
        options: BuildOptionSet<O>,
        toolchain: Arc<dyn Toolchain>,
        indexer: Arc<dyn SourceIndexer>,
        library_extension: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            options,
            toolchain,
            indexer,
            library_extension: library_extension.into(),
        }
    }

    /// Index the input directory, then build what was found.
    ///
    /// A failed index is not an error: nothing is compiled and the result is
    /// `CompileComplete`.
    pub fn build(&self, mode: ExecuteMode, sinks: &mut OutputSinks) -> QuillResult<CompilationResult> {
        self.settings.validate_required()?;

        let input: PathBuf = self.settings.get(self.options.input_directory)?;
        let Some(units) = self.indexer.index_files(&input) else {
            error!(
                language = O::LANGUAGE,
                input = %input.display(),
                "Error while indexing sources, aborting build"
            );
            return Ok(CompilationResult::new(CompilationStatus::CompileComplete)
                .with_diagnostic(format!("Nothing compiled: indexing {} failed", input.display())));
        };

        self.build_units(units, mode, sinks)
    }

    /// Build already-indexed source units
    pub fn build_units(
        &self,
        units: Vec<SourceUnit>,
        mode: ExecuteMode,
        sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult> {
        let request = self.request(units, mode)?;

        info!(
            language = O::LANGUAGE,
            toolchain = self.toolchain.name(),
            units = request.source_units.len(),
            libraries = request.libraries.len(),
            execute = request.execute,
            "Starting build"
        );

        let result = self.toolchain.compile_and_execute(&request, sinks)?;
        info!(language = O::LANGUAGE, status = %result.status, "Build finished");
        Ok(result)
    }

    /// Assemble the request for `units` from the current settings.
    ///
    /// Relative settings are resolved against the current directory, so
    /// every path in the request is absolute and tools may run anywhere.
    pub fn request(&self, units: Vec<SourceUnit>, mode: ExecuteMode) -> QuillResult<BuildRequest> {
        self.settings.validate_required()?;

        let cwd = std::env::current_dir().map_err(|e| QuillError::io_at(".", e))?;
        let absolute = |path: PathBuf| cwd.join(path);

        Ok(BuildRequest {
            source_units: units
                .into_iter()
                .map(|unit| SourceUnit {
                    path: absolute(unit.path),
                    relative: unit.relative,
                })
                .collect(),
            source_root: absolute(self.settings.get(self.options.input_directory)?),
            compiled_output: absolute(self.settings.get(self.options.compiled_output)?),
            package_target: self.read(self.options.package_target)?.map(absolute),
            other_resources: self.read(self.options.other_location)?.map(absolute),
            libraries: self.resolve_libraries().into_iter().map(absolute).collect(),
            entry_point: self.read(self.options.entry_point)?,
            mode,
            execute: self.resolve_execute(mode)?,
        })
    }

    /// Whether the program runs after compiling
    pub fn resolve_execute(&self, mode: ExecuteMode) -> QuillResult<bool> {
        match mode {
            ExecuteMode::ForceExecute => Ok(true),
            ExecuteMode::ForceNoExecute => Ok(false),
            ExecuteMode::UseConfigured => self.settings.get(self.options.execute),
        }
    }

    /// Library archives from the library location; empty when it is unset
    pub fn resolve_libraries(&self) -> Vec<PathBuf> {
        self.options
            .library_location
            .and_then(|option| self.settings.get_optional::<PathBuf>(option))
            .map(|location| collect_libraries(&location, &self.library_extension))
            .unwrap_or_default()
    }

    // Required roles must be set; optional ones may be absent.
    fn read<T: FromSettingValue>(&self, option: Option<O>) -> QuillResult<Option<T>> {
        match option {
            Some(option) if option.is_required() => self.settings.get(option).map(Some),
            Some(option) => Ok(self.settings.get_optional(option)),
            None => Ok(None),
        }
    }
}
