//! Workspace preparation

use crate::wrapper::ServerWrapper;
use quill_foundation::{QuillError, QuillResult};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Outcome of one workspace setup pass
#[derive(Debug, Default)]
pub struct SetupReport {
    /// Whether the project template was copied in this pass
    pub copied_template: bool,
    /// File groups that failed; the others were still attempted
    pub failures: Vec<QuillError>,
}

impl SetupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Record a failed file group and keep going
    pub fn record(&mut self, group: &str, result: QuillResult<()>) {
        if let Err(e) = result {
            warn!(group = %group, error = %e, "Workspace setup step failed");
            self.failures
                .push(QuillError::workspace_setup(group, e.to_string()));
        }
    }
}

/// Prepares a workspace directory before its server starts.
///
/// Implementations must be idempotent: running setup on a workspace that was
/// already initialized (or customized by the user) must not overwrite it.
pub trait WorkspaceSetup: Send + Sync {
    fn setup(&self, wrapper: &ServerWrapper, workspace: &Path) -> SetupReport;
}

/// Setup for servers that need no generated files
#[derive(Debug, Default, Clone)]
pub struct NoWorkspaceSetup;

impl WorkspaceSetup for NoWorkspaceSetup {
    fn setup(&self, _wrapper: &ServerWrapper, _workspace: &Path) -> SetupReport {
        SetupReport::default()
    }
}

/// Whether `workspace` already contains its marker descriptor
pub fn is_initialized(workspace: &Path, marker: &str) -> bool {
    workspace.join(marker).exists()
}

/// Recursively copy `template` into `workspace`, returning the file count
pub fn copy_template_dir(template: &Path, workspace: &Path) -> QuillResult<usize> {
    if !template.is_dir() {
        return Err(QuillError::workspace_setup(
            "project template",
            format!("{} is not a directory", template.display()),
        ));
    }

    let mut copied = 0;
    for entry in WalkDir::new(template) {
        let entry = entry.map_err(|e| {
            QuillError::workspace_setup("project template", e.to_string())
        })?;
        let relative = entry
            .path()
            .strip_prefix(template)
            .map_err(|e| QuillError::workspace_setup("project template", e.to_string()))?;
        let target = workspace.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| QuillError::io_at(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| QuillError::io_at(parent, e))?;
            }
            std::fs::copy(entry.path(), &target).map_err(|e| QuillError::io_at(&target, e))?;
            copied += 1;
        }
    }

    debug!(
        template = %template.display(),
        workspace = %workspace.display(),
        files = copied,
        "Copied project template"
    );
    Ok(copied)
}
