use std::process::{ExitStatus, Stdio};
use std::string::FromUtf8Error;

use rmcp::schemars::{self, JsonSchema};
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Shell;

/// Return code reported when the executor itself failed. A normal exit never produces it.
pub const SPAWN_FAILURE_CODE: i32 = -1;

/// Outcome of one shell command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CommandResult {
    /// Captured standard output, empty if the command wrote nothing
    pub stdout: String,
    /// Captured standard error, or the executor diagnostic when `return_code` is -1
    pub stderr: String,
    /// Exit code of the shell, or -1 if the command could not be run
    pub return_code: i32,
}

impl CommandResult {
    /// Result reported when spawning or capturing failed
    pub fn failure(err: &ExecError) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Error executing command: {}", err),
            return_code: SPAWN_FAILURE_CODE,
        }
    }

    pub fn success(&self) -> bool {
        self.return_code == 0
    }
}

/// Failures of the executor itself, as opposed to a command exiting non-zero
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run shell '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stream} is not valid UTF-8: {source}")]
    Decode {
        stream: &'static str,
        #[source]
        source: FromUtf8Error,
    },
}

/// Undecoded streams and exit code of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub return_code: i32,
}

/// Runs command lines through a shell interpreter, one child process per call
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    shell: Shell,
}

impl ShellExecutor {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    /// Run `command` and collect both streams as raw bytes.
    ///
    /// A non-zero exit is returned as `Ok`; only a failure to spawn or wait is an error.
    pub async fn try_output(&self, command: &str) -> Result<RawOutput, ExecError> {
        debug!(shell = %self.shell.program, command = %command, "spawning command");

        let output = Command::new(&self.shell.program)
            .arg(&self.shell.arg)
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                program: self.shell.program.clone(),
                source,
            })?;

        let return_code = exit_code(output.status);
        debug!(return_code, "command exited");

        Ok(RawOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            return_code,
        })
    }

    /// Run `command` and decode both streams as UTF-8.
    pub async fn try_execute(&self, command: &str) -> Result<CommandResult, ExecError> {
        let output = self.try_output(command).await?;
        Ok(CommandResult {
            stdout: decode(output.stdout, "stdout")?,
            stderr: decode(output.stderr, "stderr")?,
            return_code: output.return_code,
        })
    }

    /// Run `command`, folding executor failures into the result with return code -1
    pub async fn execute(&self, command: &str) -> CommandResult {
        match self.try_execute(command).await {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %command, error = %e, "command execution failed");
                CommandResult::failure(&e)
            }
        }
    }
}

pub fn decode(bytes: Vec<u8>, stream: &'static str) -> Result<String, ExecError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }
    String::from_utf8(bytes).map_err(|source| ExecError::Decode { stream, source })
}

/// Signal-terminated children report the negated signal number
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    // Only reachable off Unix, where every exit carries a code
    SPAWN_FAILURE_CODE
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn executor() -> ShellExecutor {
        ShellExecutor::default()
    }

    #[tokio::test]
    async fn test_execute_echo() {
        let result = executor().execute("echo hello").await;
        assert_eq!(
            result,
            CommandResult {
                stdout: "hello\n".to_string(),
                stderr: String::new(),
                return_code: 0,
            }
        );
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_execute_no_output() {
        let result = executor().execute("true").await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "");
        assert_eq!(result.return_code, 0);
    }

    #[tokio::test]
    async fn test_execute_exit_code() {
        let result = executor().execute("exit 7").await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "");
        assert_eq!(result.return_code, 7);
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_execute_output_with_failure_code() {
        let result = executor().execute("echo partial; echo oops >&2; exit 3").await;
        assert_eq!(result.stdout, "partial\n");
        assert_eq!(result.stderr, "oops\n");
        assert_eq!(result.return_code, 3);
    }

    #[tokio::test]
    async fn test_execute_shell_features() {
        let result = executor().execute("printf 'b\\na\\n' | sort").await;
        assert_eq!(result.stdout, "a\nb\n");
        assert_eq!(result.return_code, 0);
    }

    #[tokio::test]
    async fn test_execute_unknown_program_reported_by_shell() {
        let result = executor().execute("nonexistent-binary-xyz").await;
        assert_eq!(result.stdout, "");
        assert!(!result.stderr.is_empty());
        assert_eq!(result.return_code, 127);
    }

    #[tokio::test]
    async fn test_execute_does_not_read_parent_stdin() {
        let result = executor().execute("cat").await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.return_code, 0);
    }

    #[tokio::test]
    async fn test_execute_killed_by_signal() {
        let result = executor().execute("kill -9 $$").await;
        assert_eq!(result.return_code, -9);
    }

    #[tokio::test]
    async fn test_execute_missing_shell() {
        let executor = ShellExecutor::new(Shell {
            program: "/nonexistent/shell-xyz".to_string(),
            arg: "-c".to_string(),
        });
        let result = executor.execute("echo hello").await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.return_code, SPAWN_FAILURE_CODE);
        assert!(result.stderr.starts_with("Error executing command:"));
        assert!(result.stderr.contains("/nonexistent/shell-xyz"));
    }

    #[tokio::test]
    async fn test_try_execute_missing_shell_is_error() {
        let executor = ShellExecutor::new(Shell {
            program: "/nonexistent/shell-xyz".to_string(),
            arg: "-c".to_string(),
        });
        let err = executor.try_execute("true").await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_execute_invalid_utf8() {
        let result = executor().execute("printf '\\377'").await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.return_code, SPAWN_FAILURE_CODE);
        assert!(result.stderr.contains("stdout is not valid UTF-8"));
    }

    #[tokio::test]
    async fn test_try_output_keeps_raw_bytes() {
        let output = executor().try_output("printf '\\377'; exit 4").await.unwrap();
        assert_eq!(output.stdout, vec![0xff]);
        assert!(output.stderr.is_empty());
        assert_eq!(output.return_code, 4);
    }

    #[tokio::test]
    async fn test_execute_concurrent_calls_are_independent() {
        let executor = executor();
        let (a, b) = tokio::join!(
            executor.execute("sleep 0.2; echo first"),
            executor.execute("echo second; exit 2"),
        );
        assert_eq!(a.stdout, "first\n");
        assert_eq!(a.return_code, 0);
        assert_eq!(b.stdout, "second\n");
        assert_eq!(b.return_code, 2);
    }

    #[test]
    fn test_result_wire_shape() {
        let result = CommandResult {
            stdout: "out".to_string(),
            stderr: String::new(),
            return_code: 0,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"stdout": "out", "stderr": "", "return_code": 0})
        );
    }
}
