//! External command execution.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::error::RunnerError;

/// Exit code reported when a command was killed on timeout.
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            timed_out: false,
        }
    }

    pub fn timeout() -> Self {
        Self {
            exit_code: TIMEOUT_EXIT_CODE,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: true,
        }
    }

    /// Zero exit within the timeout.
    pub fn passed(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

/// Quote `value` for a POSIX shell using single quotes.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// The only channel through which the pipeline performs real work.
///
/// Implementations run one command at a time. A non-zero exit or a timeout
/// is a normal [`CommandOutput`]; `Err` means the command could not be run.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &str,
        timeout_secs: u64,
        workdir: &Path,
    ) -> Result<CommandOutput, RunnerError>;
}

/// Runs commands through `<shell> -c`.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: String,
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(
        &self,
        command: &str,
        timeout_secs: u64,
        workdir: &Path,
    ) -> Result<CommandOutput, RunnerError> {
        if command.trim().is_empty() {
            return Err(RunnerError::EmptyCommand);
        }

        debug!(shell = %self.shell, command = %command, workdir = %workdir.display(), "spawning");

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // 0 disables the timeout
        let output = if timeout_secs > 0 {
            match tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                child.wait_with_output(),
            )
            .await
            {
                Ok(output) => output?,
                // dropping the future kills the child
                Err(_) => return Ok(CommandOutput::timeout()),
            }
        } else {
            child.wait_with_output().await?
        };

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            timed_out: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("plain"), "'plain'");
    }

    #[tokio::test]
    async fn test_quoted_value_is_one_word() {
        let dir = tempfile::tempdir().unwrap();
        let hostile = "a' ; echo injected ; echo 'b";
        let output = ShellCommandRunner::default()
            .run(&format!("printf '%s' {}", shell_quote(hostile)), 60, dir.path())
            .await
            .unwrap();
        assert_eq!(output.stdout, hostile);
    }

    #[test]
    fn test_command_output_passed() {
        assert!(CommandOutput::success("ok").passed());
        assert!(!CommandOutput::failure(2, "boom").passed());
        assert!(!CommandOutput::timeout().passed());
    }

    #[tokio::test]
    async fn test_execute_simple_command() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellCommandRunner::default()
            .run("echo hello", 60, dir.path())
            .await
            .expect("run failed");
        assert!(output.passed());
        assert!(output.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_execute_failing_command() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellCommandRunner::default()
            .run("echo oops >&2; exit 3", 60, dir.path())
            .await
            .expect("run failed");
        assert_eq!(output.exit_code, 3);
        assert!(output.stderr.contains("oops"));
        assert!(!output.timed_out);
    }

    #[tokio::test]
    async fn test_runs_in_workdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("idea.txt"), "hello").unwrap();
        let output = ShellCommandRunner::default()
            .run("cat idea.txt", 60, dir.path())
            .await
            .unwrap();
        assert_eq!(output.stdout, "hello");
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellCommandRunner::default()
            .run("sleep 5", 1, dir.path())
            .await
            .unwrap();
        assert!(output.timed_out);
        assert_eq!(output.exit_code, TIMEOUT_EXIT_CODE);
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellCommandRunner::default()
            .run("  ", 60, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::EmptyCommand));
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellCommandRunner::new("/nonexistent/shell")
            .run("echo hi", 60, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }
}
