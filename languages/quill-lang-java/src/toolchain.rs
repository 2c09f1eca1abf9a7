//! javac/jar/java toolchain

use quill_build::{run_to_sinks, StdoutSink};
use quill_foundation::{QuillError, QuillResult};
use quill_plugin_api::{BuildRequest, CompilationResult, CompilationStatus, OutputSinks, Toolchain};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Compiles with `javac`, packages with `jar` and runs with `java`
#[derive(Debug, Clone)]
pub struct JavacToolchain {
    javac: PathBuf,
    jar: PathBuf,
    java: PathBuf,
}

impl Default for JavacToolchain {
    fn default() -> Self {
        Self {
            javac: PathBuf::from("javac"),
            jar: PathBuf::from("jar"),
            java: PathBuf::from("java"),
        }
    }
}

impl JavacToolchain {
    /// Use the JDK binaries under `java_home/bin`
    pub fn with_java_home(java_home: &Path) -> Self {
        let bin = java_home.join("bin");
        Self {
            javac: bin.join("javac"),
            jar: bin.join("jar"),
            java: bin.join("java"),
        }
    }

    fn compile(&self, request: &BuildRequest, sinks: &mut OutputSinks) -> QuillResult<bool> {
        std::fs::create_dir_all(&request.compiled_output)
            .map_err(|e| QuillError::io_at(&request.compiled_output, e))?;

        let mut command = Command::new(&self.javac);
        command
            .current_dir(&request.source_root)
            .arg("-d")
            .arg(&request.compiled_output);
        if !request.libraries.is_empty() {
            command.arg("-cp").arg(class_path(&request.libraries)?);
        }
        command.args(request.source_units.iter().map(|unit| &unit.path));

        info!(files = request.source_units.len(), "Compiling Java sources");
        run_to_sinks(&mut command, StdoutSink::Compiler, sinks)
    }

    fn package(&self, request: &BuildRequest, jar: &Path, sinks: &mut OutputSinks) -> QuillResult<bool> {
        if let Some(resources) = &request.other_resources {
            let copied = copy_resources(resources, &request.compiled_output)?;
            debug!(resources = %resources.display(), copied, "Copied resources");
        }
        if let Some(parent) = jar.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| QuillError::io_at(parent, e))?;
        }

        let mut command = Command::new(&self.jar);
        command.current_dir(&request.source_root);
        match &request.entry_point {
            Some(main) => command.arg("cfe").arg(jar).arg(main),
            None => command.arg("cf").arg(jar),
        };
        command.arg("-C").arg(&request.compiled_output).arg(".");

        info!(jar = %jar.display(), "Packaging jar");
        run_to_sinks(&mut command, StdoutSink::Compiler, sinks)
    }

    fn run(&self, request: &BuildRequest, main: &str, sinks: &mut OutputSinks) -> QuillResult<bool> {
        let mut entries = vec![request
            .package_target
            .clone()
            .unwrap_or_else(|| request.compiled_output.clone())];
        entries.extend(request.libraries.iter().cloned());

        let mut command = Command::new(&self.java);
        command
            .current_dir(&request.source_root)
            .arg("-cp")
            .arg(class_path(&entries)?)
            .arg(main);

        info!(main = %main, "Running program");
        run_to_sinks(&mut command, StdoutSink::Program, sinks)
    }
}

impl Toolchain for JavacToolchain {
    fn name(&self) -> &'static str {
        "javac"
    }

    fn compile_and_execute(
        &self,
        request: &BuildRequest,
        sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult> {
        if request.source_units.is_empty() {
            writeln!(sinks.compiler, "No Java sources found in {}", request.source_root.display())?;
            return Ok(CompilationResult::new(CompilationStatus::CompileComplete)
                .with_diagnostic("No sources to compile"));
        }

        if !self.compile(request, sinks)? {
            return Ok(CompilationResult::new(CompilationStatus::CompileFailed)
                .with_diagnostic("javac reported errors"));
        }

        if let Some(jar) = &request.package_target {
            if !self.package(request, jar, sinks)? {
                return Ok(CompilationResult::new(CompilationStatus::CompileFailed)
                    .with_diagnostic(format!("Failed to package {}", jar.display())));
            }
        }

        if !request.execute {
            return Ok(CompilationResult::new(CompilationStatus::CompileComplete));
        }

        let Some(main) = request.entry_point.as_deref() else {
            return Ok(CompilationResult::new(CompilationStatus::ExecutionFailed)
                .with_diagnostic("No main class configured"));
        };

        let status = if self.run(request, main, sinks)? {
            CompilationStatus::ExecutionComplete
        } else {
            CompilationStatus::ExecutionFailed
        };
        Ok(CompilationResult::new(status))
    }
}

fn class_path(entries: &[PathBuf]) -> QuillResult<OsString> {
    std::env::join_paths(entries)
        .map_err(|e| QuillError::config(format!("Invalid class path entry: {}", e)))
}

/// Copy the files under `resources` into `target`, returning the file count
fn copy_resources(resources: &Path, target: &Path) -> QuillResult<usize> {
    if resources.is_file() {
        let name = resources.file_name().unwrap_or(resources.as_os_str());
        std::fs::copy(resources, target.join(name)).map_err(|e| QuillError::io_at(resources, e))?;
        return Ok(1);
    }

    let mut copied = 0;
    for entry in WalkDir::new(resources) {
        let entry = entry.map_err(|e| QuillError::config(format!("Unreadable resource: {}", e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(resources).unwrap_or(entry.path());
        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| QuillError::io_at(parent, e))?;
        }
        std::fs::copy(entry.path(), &destination).map_err(|e| QuillError::io_at(&destination, e))?;
        copied += 1;
    }
    Ok(copied)
}
