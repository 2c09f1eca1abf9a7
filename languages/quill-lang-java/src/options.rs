//! Java settings keys

use quill_config::{SettingOption, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaOption {
    /// Root of the `.java` sources
    InputDirectory,
    /// Fully qualified main class
    MainClass,
    /// Jar the compiled classes are packaged into
    JarFile,
    /// Directory receiving `.class` files
    ClassOutput,
    /// Run the program after a successful build
    Execute,
    /// A jar, or a directory searched recursively for jars
    LibraryLocation,
    /// Resources copied into the jar
    OtherLocation,
    /// Target version, e.g. "Java 11"
    JavaVersion,
    ProgramOutput,
    CompilerOutput,
}

impl SettingOption for JavaOption {
    const LANGUAGE: &'static str = "Java";

    fn all() -> &'static [Self] {
        &[
            JavaOption::InputDirectory,
            JavaOption::MainClass,
            JavaOption::JarFile,
            JavaOption::ClassOutput,
            JavaOption::Execute,
            JavaOption::LibraryLocation,
            JavaOption::OtherLocation,
            JavaOption::JavaVersion,
            JavaOption::ProgramOutput,
            JavaOption::CompilerOutput,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            JavaOption::InputDirectory => "inputDirectory",
            JavaOption::MainClass => "classLocation",
            JavaOption::JarFile => "jarFile",
            JavaOption::ClassOutput => "classOutput",
            JavaOption::Execute => "execute",
            JavaOption::LibraryLocation => "libraryLocation",
            JavaOption::OtherLocation => "otherLocation",
            JavaOption::JavaVersion => "javaVersion",
            JavaOption::ProgramOutput => "programOutput",
            JavaOption::CompilerOutput => "compilerOutput",
        }
    }

    fn is_required(&self) -> bool {
        matches!(
            self,
            JavaOption::InputDirectory
                | JavaOption::MainClass
                | JavaOption::JarFile
                | JavaOption::ClassOutput
                | JavaOption::Execute
        )
    }

    fn kind(&self) -> ValueKind {
        match self {
            JavaOption::MainClass | JavaOption::JavaVersion => ValueKind::Text,
            JavaOption::Execute => ValueKind::Flag,
            _ => ValueKind::Path,
        }
    }
}
