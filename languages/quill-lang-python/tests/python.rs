use pretty_assertions::assert_eq;
use quill_config::AppConfig;
use quill_lang_python::{PythonLanguage, PythonOption};
use quill_plugin_api::{CompilationStatus, ExecuteMode, Language, OutputSinks};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn python_available() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn project(dir: &Path, main: &str) -> PythonLanguage {
    let src = dir.join("src");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("main.py"), main).unwrap();

    let python = PythonLanguage::new(&AppConfig::default()).unwrap();
    let store = python.store();
    store.set(PythonOption::InputDirectory, src).unwrap();
    store.set(PythonOption::MainFile, "main.py").unwrap();
    store
        .set(PythonOption::CacheDirectory, dir.join("cache"))
        .unwrap();
    store.set(PythonOption::Execute, true).unwrap();
    python
}

#[test]
fn test_identity() {
    let python = PythonLanguage::new(&AppConfig::default()).unwrap();
    assert_eq!(python.name(), "Python");
    let capabilities = python.capabilities();
    assert!(capabilities.interpreted);
    assert!(capabilities.runtime);
    assert!(python.runtime_download_link().is_some());
    assert_eq!(
        python.settings().option_names(),
        vec![
            "inputDirectory",
            "mainFile",
            "cacheDirectory",
            "execute",
            "libraryLocation",
            "programOutput",
            "compilerOutput",
        ]
    );
}

#[test]
fn test_runs_script_into_program_sink() {
    if !python_available() {
        eprintln!("python3 not installed, skipping");
        return;
    }
    let dir = TempDir::new().unwrap();
    let python = project(dir.path(), "print('hello from quill')\n");

    let program = Capture::default();
    let compiler = Capture::default();
    let mut sinks = OutputSinks::new(program.clone(), compiler.clone());

    let result = python
        .compile_and_execute(ExecuteMode::UseConfigured, &mut sinks)
        .unwrap();

    assert_eq!(result.status, CompilationStatus::ExecutionComplete);
    assert_eq!(program.text(), "hello from quill\n");
    assert!(!compiler.text().contains("hello"));
}

#[test]
fn test_syntax_error_fails_compile() {
    if !python_available() {
        eprintln!("python3 not installed, skipping");
        return;
    }
    let dir = TempDir::new().unwrap();
    let python = project(dir.path(), "def broken(:\n");

    let compiler = Capture::default();
    let mut sinks = OutputSinks::new(std::io::sink(), compiler.clone());

    let result = python
        .compile_and_execute(ExecuteMode::ForceExecute, &mut sinks)
        .unwrap();

    assert_eq!(result.status, CompilationStatus::CompileFailed);
    assert!(compiler.text().contains("SyntaxError"));
}

#[test]
fn test_no_execute_stops_after_compile() {
    if !python_available() {
        eprintln!("python3 not installed, skipping");
        return;
    }
    let dir = TempDir::new().unwrap();
    let python = project(dir.path(), "print('should not run')\n");

    let program = Capture::default();
    let mut sinks = OutputSinks::new(program.clone(), std::io::sink());

    let result = python
        .compile_and_execute(ExecuteMode::ForceNoExecute, &mut sinks)
        .unwrap();

    assert_eq!(result.status, CompilationStatus::CompileComplete);
    assert!(program.text().is_empty());
}

#[test]
fn test_relative_input_directory_runs() {
    if !python_available() {
        eprintln!("python3 not installed, skipping");
        return;
    }
    // Created under the crate directory so its path is relative to the cwd
    let dir = TempDir::new_in(".").unwrap();
    assert!(dir.path().is_relative());
    let python = project(dir.path(), "print('relative ok')\n");

    let program = Capture::default();
    let compiler = Capture::default();
    let mut sinks = OutputSinks::new(program.clone(), compiler.clone());

    let result = python
        .compile_and_execute(ExecuteMode::ForceExecute, &mut sinks)
        .unwrap();

    assert_eq!(result.status, CompilationStatus::ExecutionComplete, "{}", compiler.text());
    assert_eq!(program.text(), "relative ok\n");
}
