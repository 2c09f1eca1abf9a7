//! Server launch command templates

use quill_foundation::{QuillError, QuillResult};
use quill_template::substitute;
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder for the server installation directory
pub const SERVER_PATH_VARIABLE: &str = "server-path";

/// Placeholder for the workspace directory
pub const WORKSPACE_VARIABLE: &str = "workspace";

/// Launch command with `%server-path%` / `%workspace%` placeholders.
///
/// The first token is the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunchSpec {
    command: Vec<String>,
}

/// Launch command after placeholder substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ServerLaunchSpec {
    pub fn new<I, S>(command: I) -> QuillResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<String> = command.into_iter().map(Into::into).collect();
        if command.is_empty() {
            return Err(QuillError::config("Server launch command cannot be empty"));
        }
        Ok(Self { command })
    }

    pub fn tokens(&self) -> &[String] {
        &self.command
    }

    /// Substitute the placeholders into every token
    pub fn resolve(&self, install_path: &Path, workspace: &Path) -> ResolvedCommand {
        let variables = BTreeMap::from([
            (
                SERVER_PATH_VARIABLE.to_string(),
                install_path.display().to_string(),
            ),
            (WORKSPACE_VARIABLE.to_string(), workspace.display().to_string()),
        ]);

        let mut tokens = self.command.iter().map(|token| substitute(token, &variables));
        // new() guarantees at least one token
        let program = tokens.next().unwrap_or_default();
        ResolvedCommand {
            program,
            args: tokens.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_substitutes_every_token() {
        let spec = ServerLaunchSpec::new([
            "java",
            "-jar",
            "%server-path%/plugins/launcher.jar",
            "-configuration",
            "%server-path%/config_linux",
            "-data",
            "%workspace%",
        ])
        .unwrap();

        let resolved = spec.resolve(Path::new("/opt/jdtls"), Path::new("/tmp/ws"));
        assert_eq!(resolved.program, "java");
        assert_eq!(
            resolved.args,
            vec![
                "-jar",
                "/opt/jdtls/plugins/launcher.jar",
                "-configuration",
                "/opt/jdtls/config_linux",
                "-data",
                "/tmp/ws",
            ]
        );
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let spec = ServerLaunchSpec::new(["pylsp", "--log-file", "%log%"]).unwrap();
        let resolved = spec.resolve(Path::new("/x"), Path::new("/y"));
        assert_eq!(resolved.args, vec!["--log-file", "%log%"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(ServerLaunchSpec::new(Vec::<String>::new()).is_err());
    }
}
