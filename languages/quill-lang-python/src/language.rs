use crate::options::PythonOption;
use crate::toolchain::PythonToolchain;
use quill_build::{BuildOptionSet, BuildOrchestrator};
use quill_config::{AppConfig, DynSettings, SettingsStore};
use quill_foundation::QuillResult;
use quill_lsp::{locate_install, NoWorkspaceSetup, ServerLaunchSpec, ServerWrapper};
use quill_plugin_api::{
    CompilationResult, ExecuteMode, FileSystemIndexer, Language, LanguageCapabilities,
    OutputSinks, SourceIndexer, SourceUnit, Toolchain,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

pub const CONFIG_KEY: &str = "python";

const EXTENSIONS: &[&str] = &["py"];

const BUILD_OPTIONS: BuildOptionSet<PythonOption> = BuildOptionSet {
    input_directory: PythonOption::InputDirectory,
    compiled_output: PythonOption::CacheDirectory,
    package_target: None,
    entry_point: Some(PythonOption::MainFile),
    library_location: Some(PythonOption::LibraryLocation),
    other_location: None,
    execute: PythonOption::Execute,
};

/// Python support: interpreted runs and the `pylsp` language server
pub struct PythonLanguage {
    settings: Arc<SettingsStore<PythonOption>>,
    indexer: Arc<FileSystemIndexer>,
    orchestrator: BuildOrchestrator<PythonOption>,
    server: Option<ServerWrapper>,
}

impl PythonLanguage {
    pub fn new(config: &AppConfig) -> QuillResult<Self> {
        Self::with_toolchain(config, Arc::new(PythonToolchain::default()))
    }

    pub fn with_toolchain(config: &AppConfig, toolchain: Arc<dyn Toolchain>) -> QuillResult<Self> {
        let language_config = config.language(CONFIG_KEY);
        let settings = Arc::new(SettingsStore::new());
        let indexer = Arc::new(FileSystemIndexer::new(EXTENSIONS));
        let orchestrator = BuildOrchestrator::new(
            settings.clone(),
            BUILD_OPTIONS,
            toolchain,
            indexer.clone(),
            "whl",
        );

        let server = match locate_install(language_config.server_install_path.as_deref(), "pylsp") {
            Ok(install) => {
                let launch = language_config
                    .launch
                    .clone()
                    .unwrap_or_else(|| vec!["%server-path%/pylsp".to_string()]);
                Some(ServerWrapper::new(
                    "pylsp",
                    ServerLaunchSpec::new(launch)?,
                    install,
                    Arc::new(NoWorkspaceSetup),
                ))
            }
            Err(e) => {
                warn!(error = %e, "Python language server unavailable");
                None
            }
        };

        Ok(Self {
            settings,
            indexer,
            orchestrator,
            server,
        })
    }

    pub fn store(&self) -> &Arc<SettingsStore<PythonOption>> {
        &self.settings
    }
}

impl Language for PythonLanguage {
    fn name(&self) -> &'static str {
        "Python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn capabilities(&self) -> LanguageCapabilities {
        LanguageCapabilities::none()
            .with_language_server()
            .with_runtime()
            .interpreted()
    }

    fn settings(&self) -> &dyn DynSettings {
        self.settings.as_ref()
    }

    fn input_option(&self) -> &'static str {
        "inputDirectory"
    }

    fn program_output(&self) -> Option<PathBuf> {
        self.settings.get_optional(PythonOption::ProgramOutput)
    }

    fn compiler_output(&self) -> Option<PathBuf> {
        self.settings.get_optional(PythonOption::CompilerOutput)
    }

    fn runtime_download_link(&self) -> Option<&'static str> {
        Some("https://www.python.org/downloads/")
    }

    fn index_files(&self) -> Option<Vec<SourceUnit>> {
        let input: PathBuf = self.settings.get_optional(PythonOption::InputDirectory)?;
        self.indexer.index_files(&input)
    }

    fn compile_and_execute(
        &self,
        mode: ExecuteMode,
        sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult> {
        self.orchestrator.build(mode, sinks)
    }

    fn server(&self) -> Option<&ServerWrapper> {
        self.server.as_ref()
    }
}
