//! In-memory command runner (testing only).
//!
//! `ScriptedRunner` answers commands from a list of substring rules and
//! records everything it was asked to run, so executor and orchestrator
//! behavior can be checked without spawning processes.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RunnerError;
use crate::runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
enum Reply {
    Output(CommandOutput),
    SpawnError,
}

/// Scripted [`CommandRunner`]: the first rule whose substring occurs in the
/// command wins; unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs that satisfy every stage check of the default step table.
    pub fn passing_pipeline() -> Self {
        Self::new()
            .on("--idea-file", CommandOutput::success("complexity: medium\nis_valid: true\n"))
            .on(
                "Analyze requirements",
                CommandOutput::success(
                    "Recommended architecture: a layered service with a REST API, a \
                     persistence module and a background worker for notifications.",
                ),
            )
            .on(
                "implementation plan",
                CommandOutput::success("Plan ready. Steps: scaffold, implement, verify."),
            )
            .on(
                "Implement the project",
                CommandOutput::success("Created 14 files and generated the module skeleton."),
            )
            .on(
                "Run comprehensive tests",
                CommandOutput::success("38 tests passed"),
            )
            .on(
                "Deploy and verify",
                CommandOutput::success("Service deployed and running"),
            )
    }

    /// Answer commands containing `pattern` with `output`.
    pub fn on(mut self, pattern: impl Into<String>, output: CommandOutput) -> Self {
        self.rules.insert(0, (pattern.into(), Reply::Output(output)));
        self
    }

    /// Fail to spawn commands containing `pattern`.
    pub fn unspawnable(mut self, pattern: impl Into<String>) -> Self {
        self.rules.insert(0, (pattern.into(), Reply::SpawnError));
        self
    }

    /// Every command received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any received command contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c.contains(pattern))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        command: &str,
        _timeout_secs: u64,
        _workdir: &Path,
    ) -> Result<CommandOutput, RunnerError> {
        self.calls.lock().unwrap().push(command.to_string());

        let reply = self
            .rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::SpawnError) => Err(RunnerError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
            None => Ok(CommandOutput::success("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_later_rules_take_precedence() {
        let runner = ScriptedRunner::new()
            .on("deploy", CommandOutput::success("first"))
            .on("deploy", CommandOutput::failure(1, "second"));

        let output = runner.run("deploy now", 5, Path::new(".")).await.unwrap();
        assert_eq!(output.exit_code, 1);
        assert!(runner.ran("deploy now"));
    }

    #[tokio::test]
    async fn test_unmatched_command_succeeds_empty() {
        let runner = ScriptedRunner::new();
        let output = runner.run("echo", 5, Path::new(".")).await.unwrap();
        assert!(output.passed());
        assert!(output.stdout.is_empty());
        assert_eq!(runner.calls(), vec!["echo".to_string()]);
    }

    #[tokio::test]
    async fn test_unspawnable() {
        let runner = ScriptedRunner::new().unspawnable("missing-tool");
        let err = runner.run("missing-tool --version", 5, Path::new(".")).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
    }
}
