//! Build data types shared by orchestrators and toolchains

use quill_foundation::{QuillError, QuillResult};
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One source file found by indexing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceUnit {
    /// Absolute (or caller-rooted) path of the file
    pub path: PathBuf,
    /// Path relative to the indexed input directory
    pub relative: PathBuf,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
        }
    }
}

/// Whether a build should run the program after compiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecuteMode {
    ForceExecute,
    ForceNoExecute,
    /// Follow the language's `execute` setting
    #[default]
    UseConfigured,
}

/// Everything a toolchain needs for one build. Paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub source_units: Vec<SourceUnit>,
    /// Directory the source units were indexed from
    pub source_root: PathBuf,
    /// Directory receiving compiled artifacts
    pub compiled_output: PathBuf,
    /// Packaged program, e.g. a jar
    pub package_target: Option<PathBuf>,
    /// Extra resources bundled into the package
    pub other_resources: Option<PathBuf>,
    /// Library archives on the class/module path
    pub libraries: Vec<PathBuf>,
    /// Main class or script to run
    pub entry_point: Option<String>,
    pub mode: ExecuteMode,
    /// `mode` resolved against the settings
    pub execute: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationStatus {
    CompileComplete,
    CompileFailed,
    ExecutionComplete,
    ExecutionFailed,
}

impl CompilationStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CompilationStatus::CompileComplete | CompilationStatus::ExecutionComplete
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompilationStatus::CompileComplete => "compile complete",
            CompilationStatus::CompileFailed => "compile failed",
            CompilationStatus::ExecutionComplete => "execution complete",
            CompilationStatus::ExecutionFailed => "execution failed",
        }
    }
}

impl fmt::Display for CompilationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a build plus any diagnostics worth surfacing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationResult {
    pub status: CompilationStatus,
    pub diagnostics: Vec<String>,
}

impl CompilationResult {
    pub fn new(status: CompilationStatus) -> Self {
        Self {
            status,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostics.push(diagnostic.into());
        self
    }
}

/// The two output streams of a build.
///
/// Program output and compiler diagnostics never share a stream.
pub struct OutputSinks {
    pub program: Box<dyn Write + Send>,
    pub compiler: Box<dyn Write + Send>,
}

impl fmt::Debug for OutputSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSinks").finish_non_exhaustive()
    }
}

impl OutputSinks {
    pub fn new(program: impl Write + Send + 'static, compiler: impl Write + Send + 'static) -> Self {
        Self {
            program: Box::new(program),
            compiler: Box::new(compiler),
        }
    }

    /// Program output to stdout, diagnostics to stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    /// Write to the given files, falling back to stdio for `None`
    pub fn to_files(program: Option<&Path>, compiler: Option<&Path>) -> QuillResult<Self> {
        let program: Box<dyn Write + Send> = match program {
            Some(path) => Box::new(create(path)?),
            None => Box::new(io::stdout()),
        };
        let compiler: Box<dyn Write + Send> = match compiler {
            Some(path) => Box::new(create(path)?),
            None => Box::new(io::stderr()),
        };
        Ok(Self { program, compiler })
    }

    pub fn flush(&mut self) -> QuillResult<()> {
        self.program.flush()?;
        self.compiler.flush()?;
        Ok(())
    }
}

fn create(path: &Path) -> QuillResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| QuillError::io_at(parent, e))?;
    }
    File::create(path).map_err(|e| QuillError::io_at(path, e))
}
