//! Language server installation discovery

use quill_foundation::{QuillError, QuillResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find the directory a server is installed in.
///
/// A configured directory wins when it exists. Otherwise the directory
/// containing `binary` on `PATH` is used.
pub fn locate_install(configured: Option<&Path>, binary: &str) -> QuillResult<PathBuf> {
    if let Some(path) = configured {
        if path.is_dir() {
            debug!(path = %path.display(), "Using configured server installation");
            return Ok(path.to_path_buf());
        }
        debug!(path = %path.display(), "Configured server installation does not exist");
    }

    let found = which::which(binary).map_err(|_| {
        QuillError::config(format!(
            "Language server '{}' not found: set serverInstallPath or add it to PATH",
            binary
        ))
    })?;

    let dir = found
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| QuillError::config(format!("{} has no parent directory", found.display())))?;
    debug!(binary = %binary, path = %dir.display(), "Found server on PATH");
    Ok(dir)
}
