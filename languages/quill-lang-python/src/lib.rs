//! Python language plugin
//!
//! Sources are byte-compiled with `python3 -m py_compile` as a syntax check
//! and run with `python3`. The language server is `pylsp`, which needs no
//! workspace files.

mod language;
mod options;
mod toolchain;

pub use language::{PythonLanguage, CONFIG_KEY};
pub use options::PythonOption;
pub use toolchain::PythonToolchain;
