use quill_build::{run_to_sinks, StdoutSink};
use quill_foundation::{QuillError, QuillResult};
use quill_plugin_api::{BuildRequest, CompilationResult, CompilationStatus, OutputSinks, Toolchain};
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

/// Byte-compiles and runs scripts with a Python 3 interpreter
#[derive(Debug, Clone)]
pub struct PythonToolchain {
    interpreter: PathBuf,
}

impl Default for PythonToolchain {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl PythonToolchain {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn command(&self, request: &BuildRequest) -> QuillResult<Command> {
        let mut search_path = request.libraries.clone();
        search_path.push(request.source_root.clone());
        let python_path = std::env::join_paths(&search_path)
            .map_err(|e| QuillError::config(format!("Invalid PYTHONPATH entry: {}", e)))?;

        let mut command = Command::new(&self.interpreter);
        command
            .current_dir(&request.source_root)
            .env("PYTHONPATH", python_path)
            .env("PYTHONPYCACHEPREFIX", &request.compiled_output);
        Ok(command)
    }
}

impl Toolchain for PythonToolchain {
    fn name(&self) -> &'static str {
        "python3"
    }

    fn compile_and_execute(
        &self,
        request: &BuildRequest,
        sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult> {
        if !request.source_units.is_empty() {
            let mut check = self.command(request)?;
            check
                .args(["-m", "py_compile"])
                .args(request.source_units.iter().map(|unit| &unit.path));

            info!(files = request.source_units.len(), "Byte-compiling Python sources");
            if !run_to_sinks(&mut check, StdoutSink::Compiler, sinks)? {
                return Ok(CompilationResult::new(CompilationStatus::CompileFailed)
                    .with_diagnostic("py_compile reported errors"));
            }
        }

        if !request.execute {
            return Ok(CompilationResult::new(CompilationStatus::CompileComplete));
        }

        let Some(main) = request.entry_point.as_deref() else {
            return Ok(CompilationResult::new(CompilationStatus::ExecutionFailed)
                .with_diagnostic("No main file configured"));
        };

        let mut run = self.command(request)?;
        run.arg(request.source_root.join(main));

        info!(main = %main, "Running script");
        let status = if run_to_sinks(&mut run, StdoutSink::Program, sinks)? {
            CompilationStatus::ExecutionComplete
        } else {
            CompilationStatus::ExecutionFailed
        };
        Ok(CompilationResult::new(status))
    }
}
