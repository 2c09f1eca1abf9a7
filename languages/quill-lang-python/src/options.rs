use quill_config::{SettingOption, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PythonOption {
    InputDirectory,
    /// Script to run, relative to the input directory
    MainFile,
    /// Where byte-compiled files are written
    CacheDirectory,
    Execute,
    /// A wheel, or a directory searched recursively for wheels
    LibraryLocation,
    ProgramOutput,
    CompilerOutput,
}

impl SettingOption for PythonOption {
    const LANGUAGE: &'static str = "Python";

    fn all() -> &'static [Self] {
        &[
            PythonOption::InputDirectory,
            PythonOption::MainFile,
            PythonOption::CacheDirectory,
            PythonOption::Execute,
            PythonOption::LibraryLocation,
            PythonOption::ProgramOutput,
            PythonOption::CompilerOutput,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            PythonOption::InputDirectory => "inputDirectory",
            PythonOption::MainFile => "mainFile",
            PythonOption::CacheDirectory => "cacheDirectory",
            PythonOption::Execute => "execute",
            PythonOption::LibraryLocation => "libraryLocation",
            PythonOption::ProgramOutput => "programOutput",
            PythonOption::CompilerOutput => "compilerOutput",
        }
    }

    fn is_required(&self) -> bool {
        matches!(
            self,
            PythonOption::InputDirectory
                | PythonOption::MainFile
                | PythonOption::CacheDirectory
                | PythonOption::Execute
        )
    }

    fn kind(&self) -> ValueKind {
        match self {
            PythonOption::MainFile => ValueKind::Text,
            PythonOption::Execute => ValueKind::Flag,
            _ => ValueKind::Path,
        }
    }
}
