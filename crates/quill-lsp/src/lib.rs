//! Language server lifecycle
//!
//! A [`ServerWrapper`] owns one external language server per workspace. On
//! launch it prepares the workspace through a [`WorkspaceSetup`] (copying a
//! project template on first use and wiring descriptor files to settings),
//! then starts the server with a command resolved from a
//! [`ServerLaunchSpec`]. The server's protocol is opaque here; callers get
//! its stdio handles and nothing more.

pub mod install;
pub mod launch;
pub mod process;
pub mod workspace;
mod wrapper;

pub use install::locate_install;
pub use launch::{ResolvedCommand, ServerLaunchSpec, SERVER_PATH_VARIABLE, WORKSPACE_VARIABLE};
pub use process::{ProcessLauncher, ServerProcess, ServerStdio, TokioLauncher};
pub use workspace::{copy_template_dir, is_initialized, NoWorkspaceSetup, SetupReport, WorkspaceSetup};
pub use wrapper::ServerWrapper;
