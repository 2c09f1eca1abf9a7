use pretty_assertions::assert_eq;
use quill_config::{AppConfig, LanguageConfig};
use quill_foundation::{QuillError, QuillResult};
use quill_lang_java::{JavaLanguage, JavaOption};
use quill_plugin_api::{
    BuildRequest, CompilationResult, CompilationStatus, ExecuteMode, Language, OutputSinks,
    Toolchain,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records requests instead of compiling
#[derive(Default)]
struct RecordingToolchain {
    requests: Mutex<Vec<BuildRequest>>,
}

impl Toolchain for RecordingToolchain {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn compile_and_execute(
        &self,
        request: &BuildRequest,
        _sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CompilationResult::new(if request.execute {
            CompilationStatus::ExecutionComplete
        } else {
            CompilationStatus::CompileComplete
        }))
    }
}

fn config_with_install(install: Option<&Path>) -> AppConfig {
    let mut config = AppConfig::default();
    config.languages.insert(
        "java".to_string(),
        LanguageConfig {
            server_install_path: install.map(Path::to_path_buf),
            ..LanguageConfig::default()
        },
    );
    config
}

fn configure(java: &JavaLanguage, dir: &Path) {
    let settings = java.settings();
    settings
        .set_by_name("inputDirectory", &dir.join("src").display().to_string())
        .unwrap();
    settings.set_by_name("classLocation", "com.example.Main").unwrap();
    settings
        .set_by_name("jarFile", &dir.join("out/app.jar").display().to_string())
        .unwrap();
    settings
        .set_by_name("classOutput", &dir.join("out/classes").display().to_string())
        .unwrap();
    settings.set_by_name("execute", "no").unwrap();
}

fn sinks() -> OutputSinks {
    OutputSinks::new(std::io::sink(), std::io::sink())
}

#[test]
fn test_identity() {
    let java = JavaLanguage::new(&AppConfig::default()).unwrap();
    assert_eq!(java.name(), "Java");
    assert_eq!(java.file_extensions(), &["java"]);
    let capabilities = java.capabilities();
    assert!(capabilities.language_server);
    assert!(!capabilities.interpreted);
    assert!(!capabilities.runtime);
    assert!(java.runtime_download_link().is_none());
    assert_eq!(java.input_option(), "inputDirectory");
}

#[test]
fn test_build_indexes_and_delegates() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src/com/example")).unwrap();
    std::fs::write(dir.path().join("src/com/example/Main.java"), "class Main {}").unwrap();
    std::fs::write(dir.path().join("src/README.md"), "docs").unwrap();
    std::fs::create_dir_all(dir.path().join("libs")).unwrap();
    std::fs::write(dir.path().join("libs/dep.jar"), "").unwrap();

    let toolchain = Arc::new(RecordingToolchain::default());
    let java = JavaLanguage::with_toolchain(&AppConfig::default(), toolchain.clone()).unwrap();
    configure(&java, dir.path());
    java.store()
        .set(JavaOption::LibraryLocation, dir.path().join("libs"))
        .unwrap();

    let result = java
        .compile_and_execute(ExecuteMode::ForceExecute, &mut sinks())
        .unwrap();
    assert_eq!(result.status, CompilationStatus::ExecutionComplete);

    let requests = toolchain.requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.source_units.len(), 1);
    assert_eq!(
        request.source_units[0].relative,
        PathBuf::from("com/example/Main.java")
    );
    assert_eq!(request.libraries, vec![dir.path().join("libs/dep.jar")]);
    assert_eq!(request.entry_point.as_deref(), Some("com.example.Main"));
    assert!(request.execute);
}

#[test]
fn test_missing_sources_compile_nothing() {
    let dir = TempDir::new().unwrap();
    let toolchain = Arc::new(RecordingToolchain::default());
    let java = JavaLanguage::with_toolchain(&AppConfig::default(), toolchain.clone()).unwrap();
    configure(&java, dir.path());

    let result = java
        .compile_and_execute(ExecuteMode::UseConfigured, &mut sinks())
        .unwrap();

    assert_eq!(result.status, CompilationStatus::CompileComplete);
    assert!(java.index_files().is_none());
    assert!(toolchain.requests.lock().unwrap().is_empty());
}

#[test]
fn test_unconfigured_build_names_missing_option() {
    let java = JavaLanguage::with_toolchain(
        &AppConfig::default(),
        Arc::new(RecordingToolchain::default()),
    )
    .unwrap();

    let err = java
        .compile_and_execute(ExecuteMode::UseConfigured, &mut sinks())
        .unwrap_err();
    match err {
        QuillError::MissingRequiredSetting { option } => assert_eq!(option, "inputDirectory"),
        other => panic!("expected MissingRequiredSetting, got {other:?}"),
    }
}

#[test]
fn test_output_files_follow_settings() {
    let java = JavaLanguage::new(&AppConfig::default()).unwrap();
    assert!(java.program_output().is_none());
    java.settings()
        .set_by_name("programOutput", "run/program.log")
        .unwrap();
    assert_eq!(java.program_output(), Some(PathBuf::from("run/program.log")));
    assert!(java.compiler_output().is_none());
}

#[test]
fn test_configured_install_creates_server() {
    let install = TempDir::new().unwrap();
    let java = JavaLanguage::new(&config_with_install(Some(install.path()))).unwrap();

    let server = java.server().expect("server configured");
    assert_eq!(server.install_path(), install.path());

    let args = server.resolved_args(Path::new("/tmp/ws"));
    assert_eq!(args[0], "java");
    assert!(args.contains(&format!(
        "{}/plugins/org.eclipse.equinox.launcher.jar",
        install.path().display()
    )));
    assert_eq!(&args[args.len() - 2..], &["-data".to_string(), "/tmp/ws".to_string()]);
}

#[test]
fn test_relative_input_directory_reaches_toolchain_absolute() {
    // Created under the crate directory so its path is relative to the cwd
    let dir = TempDir::new_in(".").unwrap();
    let relative = dir.path().to_path_buf();
    assert!(relative.is_relative());
    std::fs::create_dir_all(relative.join("src/com/example")).unwrap();
    std::fs::write(relative.join("src/com/example/Main.java"), "class Main {}").unwrap();

    let toolchain = Arc::new(RecordingToolchain::default());
    let java = JavaLanguage::with_toolchain(&AppConfig::default(), toolchain.clone()).unwrap();
    configure(&java, &relative);

    java.compile_and_execute(ExecuteMode::ForceNoExecute, &mut sinks())
        .unwrap();

    let requests = toolchain.requests.lock().unwrap();
    let request = &requests[0];
    let root = std::env::current_dir().unwrap().join(&relative);
    assert_eq!(request.source_root, root.join("src"));
    assert_eq!(request.compiled_output, root.join("out/classes"));
    assert_eq!(request.package_target, Some(root.join("out/app.jar")));
    assert!(request.source_units[0].path.is_absolute());
    assert!(request.source_units[0].path.is_file());
}
