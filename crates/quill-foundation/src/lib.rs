//! Foundation Layer - shared error taxonomy
//!
//! Every Quill crate reports failures through [`QuillError`]. Configuration
//! errors (a missing required setting, an unknown option name) propagate to
//! the caller; template and workspace I/O errors are usually logged and
//! swallowed at the component boundary, but they are still modelled here so
//! the log line carries the file path and option involved.

pub mod errors;

pub use errors::{QuillError, QuillResult};
