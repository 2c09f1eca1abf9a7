//! Running build tools with their output routed to build sinks

use quill_foundation::{QuillError, QuillResult};
use quill_plugin_api::OutputSinks;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// Which sink receives a tool's stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutSink {
    Program,
    Compiler,
}

/// Run `command` to completion and copy its output into `sinks`.
///
/// stderr always goes to the compiler sink. Returns whether the tool exited
/// successfully; failing to start it at all is an error.
pub fn run_to_sinks(
    command: &mut Command,
    stdout_to: StdoutSink,
    sinks: &mut OutputSinks,
) -> QuillResult<bool> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(
        program = %program,
        args = ?command.get_args().collect::<Vec<_>>(),
        "Running build tool"
    );

    let output = command.output().map_err(|e| {
        QuillError::process(
            &program,
            format!("Failed to run. Is {} installed and in PATH? Error: {}", program, e),
        )
    })?;

    let stdout: &mut dyn Write = match stdout_to {
        StdoutSink::Program => sinks.program.as_mut(),
        StdoutSink::Compiler => sinks.compiler.as_mut(),
    };
    stdout.write_all(&output.stdout)?;
    sinks.compiler.write_all(&output.stderr)?;

    debug!(program = %program, status = %output.status, "Build tool finished");
    Ok(output.status.success())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_streams_are_routed_separately() {
        let program = Buffer::default();
        let compiler = Buffer::default();
        let mut sinks = OutputSinks::new(program.clone(), compiler.clone());

        let ok = run_to_sinks(
            Command::new("sh").args(["-c", "echo out; echo err >&2"]),
            StdoutSink::Program,
            &mut sinks,
        )
        .unwrap();

        assert!(ok);
        assert_eq!(program.text(), "out\n");
        assert_eq!(compiler.text(), "err\n");
    }

    #[test]
    fn test_failure_status_is_reported() {
        let mut sinks = OutputSinks::new(std::io::sink(), std::io::sink());
        let ok = run_to_sinks(
            Command::new("sh").args(["-c", "exit 2"]),
            StdoutSink::Compiler,
            &mut sinks,
        )
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_missing_program_is_process_error() {
        let mut sinks = OutputSinks::new(std::io::sink(), std::io::sink());
        let err = run_to_sinks(
            &mut Command::new("quill-definitely-missing-tool"),
            StdoutSink::Program,
            &mut sinks,
        )
        .unwrap_err();
        assert!(matches!(err, QuillError::Process { .. }));
    }
}
