//! The Java language plugin

use crate::options::JavaOption;
use crate::setup::{JavaWorkspaceSetup, BUNDLED_TEMPLATE_DIR};
use crate::toolchain::JavacToolchain;
use quill_build::{BuildOptionSet, BuildOrchestrator};
use quill_config::{AppConfig, DynSettings, SettingsStore};
use quill_foundation::QuillResult;
use quill_lsp::{locate_install, ServerLaunchSpec, ServerWrapper};
use quill_plugin_api::{
    CompilationResult, ExecuteMode, FileSystemIndexer, Language, LanguageCapabilities,
    OutputSinks, SourceIndexer, SourceUnit, Toolchain,
};
use quill_template::TemplateBinder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key of the Java section in the application configuration
pub const CONFIG_KEY: &str = "java";

const EXTENSIONS: &[&str] = &["java"];

const BUILD_OPTIONS: BuildOptionSet<JavaOption> = BuildOptionSet {
    input_directory: JavaOption::InputDirectory,
    compiled_output: JavaOption::ClassOutput,
    package_target: Some(JavaOption::JarFile),
    entry_point: Some(JavaOption::MainClass),
    library_location: Some(JavaOption::LibraryLocation),
    other_location: Some(JavaOption::OtherLocation),
    execute: JavaOption::Execute,
};

#[cfg(target_os = "windows")]
const JDTLS_CONFIG_DIR: &str = "config_win";
#[cfg(target_os = "macos")]
const JDTLS_CONFIG_DIR: &str = "config_mac";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const JDTLS_CONFIG_DIR: &str = "config_linux";

/// jdtls launch command for an unpacked server distribution
pub fn default_launch_command() -> Vec<String> {
    [
        "java",
        "-Declipse.application=org.eclipse.jdt.ls.core.id1",
        "-Dosgi.bundles.defaultStartLevel=4",
        "-Declipse.product=org.eclipse.jdt.ls.core.product",
        "-Xmx1G",
        "-jar",
        "%server-path%/plugins/org.eclipse.equinox.launcher.jar",
        "-configuration",
    ]
    .into_iter()
    .map(String::from)
    .chain([
        format!("%server-path%/{}", JDTLS_CONFIG_DIR),
        "-data".to_string(),
        "%workspace%".to_string(),
    ])
    .collect()
}

/// Java support: javac builds and an Eclipse JDT language server
pub struct JavaLanguage {
    settings: Arc<SettingsStore<JavaOption>>,
    binder: TemplateBinder,
    indexer: Arc<FileSystemIndexer>,
    orchestrator: BuildOrchestrator<JavaOption>,
    server: Option<ServerWrapper>,
}

impl JavaLanguage {
    pub fn new(config: &AppConfig) -> QuillResult<Self> {
        Self::with_toolchain(config, Arc::new(JavacToolchain::default()))
    }

    pub fn with_toolchain(config: &AppConfig, toolchain: Arc<dyn Toolchain>) -> QuillResult<Self> {
        let language_config = config.language(CONFIG_KEY);
        let settings = Arc::new(SettingsStore::new());
        let binder = TemplateBinder::new();
        let indexer = Arc::new(FileSystemIndexer::new(EXTENSIONS));

        let orchestrator = BuildOrchestrator::new(
            settings.clone(),
            BUILD_OPTIONS,
            toolchain,
            indexer.clone(),
            "jar",
        );

        let server = match locate_install(language_config.server_install_path.as_deref(), "jdtls") {
            Ok(install) => {
                // A jdtls found on PATH is its own launcher script
                let launch = language_config.launch.clone().unwrap_or_else(|| {
                    if language_config
                        .server_install_path
                        .as_deref()
                        .is_some_and(Path::is_dir)
                    {
                        default_launch_command()
                    } else {
                        vec![
                            "%server-path%/jdtls".to_string(),
                            "-data".to_string(),
                            "%workspace%".to_string(),
                        ]
                    }
                });
                let template_dir = language_config
                    .server_template_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(BUNDLED_TEMPLATE_DIR));
                let setup = JavaWorkspaceSetup::new(
                    settings.clone(),
                    binder.clone(),
                    template_dir,
                    config.project.name.clone(),
                    absolute(&config.project.root),
                );
                Some(ServerWrapper::new(
                    "jdtls",
                    ServerLaunchSpec::new(launch)?,
                    install,
                    Arc::new(setup),
                ))
            }
            Err(e) => {
                warn!(error = %e, "Java language server unavailable");
                None
            }
        };

        debug!(server = server.is_some(), "Java language initialized");
        Ok(Self {
            settings,
            binder,
            indexer,
            orchestrator,
            server,
        })
    }

    /// Typed settings store
    pub fn store(&self) -> &Arc<SettingsStore<JavaOption>> {
        &self.settings
    }

    /// Template bindings of the workspace descriptors
    pub fn binder(&self) -> &TemplateBinder {
        &self.binder
    }

    pub fn orchestrator(&self) -> &BuildOrchestrator<JavaOption> {
        &self.orchestrator
    }
}

impl Language for JavaLanguage {
    fn name(&self) -> &'static str {
        "Java"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn capabilities(&self) -> LanguageCapabilities {
        LanguageCapabilities::none().with_language_server()
    }

    fn settings(&self) -> &dyn DynSettings {
        self.settings.as_ref()
    }

    fn input_option(&self) -> &'static str {
        "inputDirectory"
    }

    fn program_output(&self) -> Option<PathBuf> {
        self.settings.get_optional(JavaOption::ProgramOutput)
    }

    fn compiler_output(&self) -> Option<PathBuf> {
        self.settings.get_optional(JavaOption::CompilerOutput)
    }

    fn index_files(&self) -> Option<Vec<SourceUnit>> {
        let input: PathBuf = self.settings.get_optional(JavaOption::InputDirectory)?;
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

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
