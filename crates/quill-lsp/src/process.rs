//! Spawning the language server process

use crate::launch::ResolvedCommand;
use async_trait::async_trait;
use quill_foundation::{QuillError, QuillResult};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

/// Stdio pipes of a running server
#[derive(Debug)]
pub struct ServerStdio {
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

/// A running server process
#[async_trait]
pub trait ServerProcess: Send {
    /// OS process id, if still known
    fn id(&self) -> Option<u32>;

    /// Whether the process has not exited yet
    fn is_alive(&mut self) -> bool;

    /// Hand the stdio pipes to the protocol client (once)
    fn take_stdio(&mut self) -> Option<ServerStdio>;

    /// Terminate the process and wait for it
    async fn kill(&mut self) -> QuillResult<()>;
}

/// Starts server processes
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn spawn(
        &self,
        command: &ResolvedCommand,
        working_dir: &Path,
    ) -> QuillResult<Box<dyn ServerProcess>>;
}

/// Launcher backed by `tokio::process`
#[derive(Debug, Default, Clone)]
pub struct TokioLauncher;

#[async_trait]
impl ProcessLauncher for TokioLauncher {
    async fn spawn(
        &self,
        command: &ResolvedCommand,
        working_dir: &Path,
    ) -> QuillResult<Box<dyn ServerProcess>> {
        debug!(
            program = %command.program,
            args = ?command.args,
            working_dir = %working_dir.display(),
            "Spawning language server"
        );

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                QuillError::process(
                    &command.program,
                    format!(
                        "Failed to spawn. Is {} installed and in PATH? Error: {}",
                        command.program, e
                    ),
                )
            })?;

        // Servers log on stderr; forward it so it is not lost
        if let Some(stderr) = child.stderr.take() {
            let program = command.program.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(server = %program, "{}", line);
                }
            });
        }

        info!(program = %command.program, pid = ?child.id(), "Language server started");
        Ok(Box::new(TokioProcess { child }))
    }
}

struct TokioProcess {
    child: Child,
}

#[async_trait]
impl ServerProcess for TokioProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn take_stdio(&mut self) -> Option<ServerStdio> {
        let stdin = self.child.stdin.take()?;
        let stdout = self.child.stdout.take()?;
        Some(ServerStdio { stdin, stdout })
    }

    async fn kill(&mut self) -> QuillResult<()> {
        match self.child.kill().await {
            Ok(()) => Ok(()),
            // Already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to kill language server");
                Err(QuillError::process("language server", e.to_string()))
            }
        }
    }
}
