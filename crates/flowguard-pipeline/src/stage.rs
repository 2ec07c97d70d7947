//! Pipeline stages and their step definitions.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::predicate::OutputPredicate;
use crate::runner::shell_quote;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validation,
    Analysis,
    Planning,
    Implementation,
    Testing,
    Deployment,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::Validation,
        PipelineStage::Analysis,
        PipelineStage::Planning,
        PipelineStage::Implementation,
        PipelineStage::Testing,
        PipelineStage::Deployment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Validation => "validation",
            PipelineStage::Analysis => "analysis",
            PipelineStage::Planning => "planning",
            PipelineStage::Implementation => "implementation",
            PipelineStage::Testing => "testing",
            PipelineStage::Deployment => "deployment",
        }
    }

    /// The stage this one depends on in the default table.
    pub fn previous(&self) -> Option<PipelineStage> {
        let idx = PipelineStage::ALL.iter().position(|s| s == self)?;
        idx.checked_sub(1).map(|i| PipelineStage::ALL[i])
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Success,
    Failed,
    RolledBack,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Running => "running",
            StageStatus::Success => "success",
            StageStatus::Failed => "failed",
            StageStatus::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command, dependencies and recovery action for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub stage: PipelineStage,

    /// Shell command line run in the project directory.
    pub command: String,

    /// Stages that must have succeeded before this one may run.
    pub dependencies: Vec<PipelineStage>,

    /// Run when a later stage fails and this is the nearest success.
    pub rollback_command: String,

    /// Output check on success; `None` falls back to the error-indicator scan.
    pub predicate: Option<OutputPredicate>,

    pub timeout_secs: u64,
}

impl StepDefinition {
    /// Custom step with no dependencies and the default output check.
    pub fn custom(stage: PipelineStage, command: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            stage,
            command: command.into(),
            dependencies: Vec::new(),
            rollback_command: String::new(),
            predicate: None,
            timeout_secs,
        }
    }

    pub fn depends_on(mut self, stage: PipelineStage) -> Self {
        self.dependencies.push(stage);
        self
    }

    pub fn with_rollback(mut self, command: impl Into<String>) -> Self {
        self.rollback_command = command.into();
        self
    }

    pub fn with_predicate(mut self, predicate: OutputPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Predicate applied to successful output.
    pub fn effective_predicate(&self) -> OutputPredicate {
        self.predicate.unwrap_or(OutputPredicate::NoErrorIndicators)
    }
}

fn command_template(stage: PipelineStage) -> (&'static str, &'static str) {
    match stage {
        PipelineStage::Validation => (
            "{checker} --idea-file idea.txt",
            "echo 'Validation failed - cannot proceed'",
        ),
        PipelineStage::Analysis => (
            "{flow} sparc architect 'Analyze requirements and suggest architecture'",
            "echo 'Analysis failed - rollback to validation'",
        ),
        PipelineStage::Planning => (
            "{flow} swarm 'Create detailed implementation plan'",
            "echo 'Planning failed - rollback to analysis'",
        ),
        PipelineStage::Implementation => (
            "{flow} swarm 'Implement the project according to plan'",
            "rm -rf {project_dir} && echo {rollback_msg}",
        ),
        PipelineStage::Testing => (
            "{flow} sparc tdd 'Run comprehensive tests'",
            "echo 'Testing failed - rollback to implementation'",
        ),
        PipelineStage::Deployment => (
            "{flow} sparc devops 'Deploy and verify'",
            "echo 'Deployment failed - rollback to testing'",
        ),
    }
}

/// Fill a command template. `{flow}` and `{checker}` are command prefixes
/// from the config and go in verbatim; project values are shell-quoted.
fn expand(template: &str, config: &RunConfig, project_name: &str, project_dir: &Path) -> String {
    let rollback_msg = format!("Implementation rolled back for {project_name}");
    template
        .replace("{flow}", &config.flow_command)
        .replace("{checker}", &config.checker_command)
        .replace("{project_dir}", &shell_quote(&project_dir.display().to_string()))
        .replace("{rollback_msg}", &shell_quote(&rollback_msg))
}

/// The six standard steps, expanded for one project.
pub fn default_steps(
    config: &RunConfig,
    project_name: &str,
    project_dir: &Path,
) -> Vec<StepDefinition> {
    PipelineStage::ALL
        .into_iter()
        .map(|stage| {
            let (command, rollback) = command_template(stage);
            StepDefinition {
                stage,
                command: expand(command, config, project_name, project_dir),
                dependencies: stage.previous().into_iter().collect(),
                rollback_command: expand(rollback, config, project_name, project_dir),
                predicate: Some(OutputPredicate::for_stage(stage)),
                timeout_secs: config.stage_timeout_secs,
            }
        })
        .collect()
}

/// Substitute the planned mode and agent count into flow commands.
///
/// Purely textual: `<flow> sparc architect` becomes `<flow> sparc <mode>` and
/// `<flow> swarm` gains `--agents <n>`. Order and dependencies are untouched.
pub fn apply_overrides(
    steps: &[StepDefinition],
    flow_command: &str,
    mode: &str,
    agent_count: u32,
) -> Vec<StepDefinition> {
    let architect = format!("{flow_command} sparc architect");
    let planned_mode = format!("{flow_command} sparc {mode}");
    let swarm = format!("{flow_command} swarm");
    let sized_swarm = format!("{flow_command} swarm --agents {agent_count}");

    steps
        .iter()
        .map(|step| {
            let mut step = step.clone();
            if step.command.contains(flow_command) {
                step.command = step.command.replace(&architect, &planned_mode);
                if !step.command.contains(&sized_swarm) {
                    step.command = step.command.replace(&swarm, &sized_swarm);
                }
            }
            step
        })
        .collect()
}
