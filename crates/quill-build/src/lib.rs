//! Build orchestration
//!
//! [`BuildOrchestrator`] reads a language's settings at build time, resolves
//! library inputs from disk, decides whether the program runs after
//! compiling and hands a [`BuildRequest`](quill_plugin_api::BuildRequest) to
//! the language's toolchain.

pub mod libraries;
pub mod orchestrator;
pub mod process;

pub use libraries::collect_libraries;
pub use orchestrator::{BuildOptionSet, BuildOrchestrator};
pub use process::{run_to_sinks, StdoutSink};
