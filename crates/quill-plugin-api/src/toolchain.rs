//! Compiler/executor contract

use crate::build::{BuildRequest, CompilationResult, OutputSinks};
use quill_foundation::QuillResult;

/// Language-specific compiler and runner.
///
/// Implementations write diagnostics to `sinks.compiler` and the program's
/// own output to `sinks.program`. A failed compile or run is reported through
/// the returned status; `Err` is reserved for the toolchain itself being
/// unusable (missing binary, unreadable inputs).
pub trait Toolchain: Send + Sync {
    fn name(&self) -> &'static str;

    fn compile_and_execute(
        &self,
        request: &BuildRequest,
        sinks: &mut OutputSinks,
    ) -> QuillResult<CompilationResult>;
}
