//! Core plugin API for language support
//!
//! Each supported language implements [`Language`]: its identity, the
//! settings it exposes, how it finds source units and how it compiles and
//! runs them. Compilation itself is delegated to a [`Toolchain`], and source
//! discovery to a [`SourceIndexer`], so both can be swapped in tests.

pub mod build;
pub mod indexer;
pub mod language;
pub mod registry;
pub mod toolchain;

pub use build::{
    BuildRequest, CompilationResult, CompilationStatus, ExecuteMode, OutputSinks, SourceUnit,
};
pub use indexer::{FileSystemIndexer, SourceIndexer};
pub use language::{Language, LanguageCapabilities};
pub use registry::LanguageRegistry;
pub use toolchain::Toolchain;
