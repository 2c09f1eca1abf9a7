//! Language server wrapper

use crate::launch::ServerLaunchSpec;
use crate::process::{ProcessLauncher, ServerProcess, ServerStdio, TokioLauncher};
use crate::workspace::{SetupReport, WorkspaceSetup};
use quill_foundation::{QuillError, QuillResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct RunningServer {
    workspace: PathBuf,
    process: Box<dyn ServerProcess>,
}

/// Owns one language server and the workspace it serves.
///
/// Clones share the running server.
#[derive(Clone)]
pub struct ServerWrapper {
    name: String,
    spec: ServerLaunchSpec,
    install_path: PathBuf,
    setup: Arc<dyn WorkspaceSetup>,
    launcher: Arc<dyn ProcessLauncher>,
    running: Arc<Mutex<Option<RunningServer>>>,
}

impl std::fmt::Debug for ServerWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerWrapper")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .field("install_path", &self.install_path)
            .finish_non_exhaustive()
    }
}

impl ServerWrapper {
    pub fn new(
        name: impl Into<String>,
        spec: ServerLaunchSpec,
        install_path: impl Into<PathBuf>,
        setup: Arc<dyn WorkspaceSetup>,
    ) -> Self {
        Self {
            name: name.into(),
            spec,
            install_path: install_path.into(),
            setup,
            launcher: Arc::new(TokioLauncher),
            running: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the process launcher
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    pub fn spec(&self) -> &ServerLaunchSpec {
        &self.spec
    }

    /// Launch arguments for `workspace` with placeholders resolved
    pub fn resolved_args(&self, workspace: &Path) -> Vec<String> {
        let resolved = self.spec.resolve(&self.install_path, workspace);
        std::iter::once(resolved.program).chain(resolved.args).collect()
    }

    /// Run workspace setup on its own, without starting the server
    pub fn prepare_workspace(&self, workspace: &Path) -> QuillResult<SetupReport> {
        std::fs::create_dir_all(workspace).map_err(|e| QuillError::io_at(workspace, e))?;

        info!(server = %self.name, workspace = %workspace.display(), "Preparing workspace");
        let report = self.setup.setup(self, workspace);
        for failure in &report.failures {
            warn!(server = %self.name, error = %failure, "Workspace setup incomplete");
        }
        Ok(report)
    }

    /// Prepare `workspace` and start the server for it.
    ///
    /// Setup completes before the process starts. Launching again for the
    /// workspace already being served is a no-op; launching for a different
    /// workspace stops the current server first.
    pub async fn launch(&self, workspace: &Path) -> QuillResult<SetupReport> {
        let mut running = self.running.lock().await;

        if let Some(current) = running.as_mut() {
            if current.workspace == workspace && current.process.is_alive() {
                debug!(server = %self.name, workspace = %workspace.display(), "Server already running");
                return Ok(SetupReport::default());
            }
            info!(
                server = %self.name,
                previous = %current.workspace.display(),
                "Stopping server for previous workspace"
            );
            current.process.kill().await?;
            *running = None;
        }

        // Setup is blocking file I/O
        let wrapper = self.clone();
        let dir = workspace.to_path_buf();
        let report = tokio::task::spawn_blocking(move || wrapper.prepare_workspace(&dir))
            .await
            .map_err(|e| QuillError::workspace_setup("setup task", e.to_string()))??;

        let command = self.spec.resolve(&self.install_path, workspace);
        let process = self.launcher.spawn(&command, workspace).await?;

        info!(
            server = %self.name,
            workspace = %workspace.display(),
            pid = ?process.id(),
            "Workspace ready"
        );
        *running = Some(RunningServer {
            workspace: workspace.to_path_buf(),
            process,
        });
        Ok(report)
    }

    pub async fn is_running(&self) -> bool {
        match self.running.lock().await.as_mut() {
            Some(current) => current.process.is_alive(),
            None => false,
        }
    }

    /// Workspace currently served
    pub async fn workspace(&self) -> Option<PathBuf> {
        self.running
            .lock()
            .await
            .as_ref()
            .map(|current| current.workspace.clone())
    }

    /// Stdio of the running server; available once per launch
    pub async fn take_stdio(&self) -> Option<ServerStdio> {
        self.running.lock().await.as_mut()?.process.take_stdio()
    }

    /// Stop the server if one is running
    pub async fn shutdown(&self) -> QuillResult<()> {
        if let Some(mut current) = self.running.lock().await.take() {
            info!(server = %self.name, workspace = %current.workspace.display(), "Stopping server");
            current.process.kill().await?;
        }
        Ok(())
    }
}
