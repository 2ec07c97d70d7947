//! Staged pipeline execution with rollback to the last good stage.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use flowguard_core::obs;
use flowguard_core::OptimizationParameters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{PipelineError, Result};
use crate::runner::CommandRunner;
use crate::stage::{apply_overrides, default_steps, PipelineStage, StageStatus, StepDefinition};

/// Name of the description file written into each project directory.
pub const IDEA_FILE: &str = "idea.txt";

/// Recorded outcome of one executed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: PipelineStage,
    pub status: StageStatus,
    pub stdout: String,
    pub stderr: Option<String>,
    pub duration_secs: f64,
}

impl StageResult {
    pub fn passed(&self) -> bool {
        self.status == StageStatus::Success
    }
}

/// The rollback attempted after a stage failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackRecord {
    pub failed_stage: PipelineStage,
    /// Nearest earlier stage that succeeded, if any.
    pub target_stage: Option<PipelineStage>,
    pub command: Option<String>,
    /// `false` when the rollback command errored or exited non-zero.
    pub completed: bool,
}

/// Terminal state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Every stage succeeded.
    Success,
    /// Halted at a failing stage after rolling back to an earlier success.
    RolledBack,
    /// Halted with nothing to roll back to.
    Failed,
}

/// Ordered stage results plus how the run ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub project_dir: PathBuf,
    pub results: Vec<StageResult>,
    pub state: PipelineState,
    /// Stage at which execution stopped, if it stopped early.
    pub halted_at: Option<PipelineStage>,
    pub rollback: Option<RollbackRecord>,
}

impl PipelineOutput {
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Success
    }

    pub fn result(&self, stage: PipelineStage) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage == stage)
    }

    /// Status of `stage`; `Pending` when it never ran.
    pub fn status_of(&self, stage: PipelineStage) -> StageStatus {
        self.result(stage)
            .map(|r| r.status)
            .unwrap_or(StageStatus::Pending)
    }

    pub fn stdout_of(&self, stage: PipelineStage) -> Option<&str> {
        self.result(stage).map(|r| r.stdout.as_str())
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed()).count()
    }
}

/// Runs pipeline steps strictly in order through a [`CommandRunner`].
#[derive(Clone)]
pub struct PipelineExecutor {
    runner: Arc<dyn CommandRunner>,
    config: RunConfig,
}

impl PipelineExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, config: RunConfig) -> Self {
        Self { runner, config }
    }

    /// Directory a project's commands run in.
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.config.workspace_root.join(project)
    }

    /// Prepare the project directory and run the default step table,
    /// parameterized by the resource plan when one is given.
    pub async fn execute(
        &self,
        project: &str,
        description: &str,
        params: Option<&OptimizationParameters>,
    ) -> Result<PipelineOutput> {
        let project_dir = self.prepare_workspace(project, description).await?;

        let mut steps = default_steps(&self.config, project, &project_dir);
        if let Some(params) = params {
            steps = apply_overrides(
                &steps,
                &self.config.flow_command,
                params.mode.as_str(),
                params.agent_count,
            );
        }

        Ok(self.execute_steps(&steps, &project_dir).await)
    }

    async fn prepare_workspace(&self, project: &str, description: &str) -> Result<PathBuf> {
        if project.trim().is_empty() || project.contains(['/', '\\']) || project.contains("..") {
            return Err(PipelineError::Config(format!(
                "invalid project name {project:?}"
            )));
        }

        let dir = self.project_dir(project);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PipelineError::Workspace {
                path: dir.clone(),
                source,
            })?;

        let idea = dir.join(IDEA_FILE);
        tokio::fs::write(&idea, description)
            .await
            .map_err(|source| PipelineError::Workspace { path: idea, source })?;

        debug!(dir = %dir.display(), "project workspace ready");
        Ok(dir)
    }

    /// Run `steps` in order inside `workdir`.
    ///
    /// A step whose dependencies have not all succeeded halts the run without
    /// being attempted. A failing step triggers a best-effort rollback to the
    /// nearest earlier success and halts the run.
    pub async fn execute_steps(&self, steps: &[StepDefinition], workdir: &Path) -> PipelineOutput {
        let mut results: Vec<StageResult> = Vec::with_capacity(steps.len());

        for step in steps {
            if let Some(missing) = unmet_dependency(step, &results) {
                warn!(
                    stage = %step.stage,
                    dependency = %missing,
                    "dependency not satisfied, halting pipeline"
                );
                return PipelineOutput {
                    project_dir: workdir.to_path_buf(),
                    results,
                    state: PipelineState::Failed,
                    halted_at: Some(step.stage),
                    rollback: None,
                };
            }

            let mut result = self.run_step(step, workdir).await;
            if result.passed() {
                results.push(result);
                continue;
            }

            let rollback = self.roll_back(step.stage, steps, &results, workdir).await;
            let state = if rollback.target_stage.is_some() {
                result.status = StageStatus::RolledBack;
                PipelineState::RolledBack
            } else {
                PipelineState::Failed
            };
            results.push(result);

            return PipelineOutput {
                project_dir: workdir.to_path_buf(),
                results,
                state,
                halted_at: Some(step.stage),
                rollback: Some(rollback),
            };
        }

        info!(stages = results.len(), "pipeline completed");
        PipelineOutput {
            project_dir: workdir.to_path_buf(),
            results,
            state: PipelineState::Success,
            halted_at: None,
            rollback: None,
        }
    }

    async fn run_step(&self, step: &StepDefinition, workdir: &Path) -> StageResult {
        obs::emit_stage_started(step.stage.name(), &step.command);
        debug!(stage = %step.stage, status = %StageStatus::Running, "stage running");
        let start = Instant::now();

        let result = match self
            .runner
            .run(&step.command, step.timeout_secs, workdir)
            .await
        {
            Ok(output) if output.timed_out => StageResult {
                stage: step.stage,
                status: StageStatus::Failed,
                stdout: output.stdout,
                stderr: Some(format!("Timeout after {} seconds", step.timeout_secs)),
                duration_secs: step.timeout_secs as f64,
            },
            Ok(output) if output.exit_code == 0 => {
                let predicate = step.effective_predicate();
                if predicate.check(&output.stdout) {
                    StageResult {
                        stage: step.stage,
                        status: StageStatus::Success,
                        stdout: output.stdout,
                        stderr: None,
                        duration_secs: start.elapsed().as_secs_f64(),
                    }
                } else {
                    warn!(stage = %step.stage, predicate = predicate.name(), "output validation failed");
                    StageResult {
                        stage: step.stage,
                        status: StageStatus::Failed,
                        stdout: output.stdout,
                        stderr: Some(format!(
                            "Output validation failed: {}",
                            predicate.name()
                        )),
                        duration_secs: start.elapsed().as_secs_f64(),
                    }
                }
            }
            Ok(output) => StageResult {
                stage: step.stage,
                status: StageStatus::Failed,
                stdout: output.stdout,
                stderr: Some(output.stderr),
                duration_secs: start.elapsed().as_secs_f64(),
            },
            Err(e) => StageResult {
                stage: step.stage,
                status: StageStatus::Failed,
                stdout: String::new(),
                stderr: Some(e.to_string()),
                duration_secs: 0.0,
            },
        };

        obs::emit_stage_finished(
            step.stage.name(),
            result.status.as_str(),
            (result.duration_secs * 1000.0) as u64,
        );
        result
    }

    async fn roll_back(
        &self,
        failed: PipelineStage,
        steps: &[StepDefinition],
        results: &[StageResult],
        workdir: &Path,
    ) -> RollbackRecord {
        let target = results.iter().rev().find(|r| r.passed()).map(|r| r.stage);
        let Some(target) = target else {
            obs::emit_stage_rolled_back(failed.name(), None, true);
            return RollbackRecord {
                failed_stage: failed,
                target_stage: None,
                command: None,
                completed: true,
            };
        };

        let command = steps
            .iter()
            .find(|s| s.stage == target)
            .map(|s| s.rollback_command.clone())
            .unwrap_or_default();

        let completed = if command.trim().is_empty() {
            true
        } else {
            match self
                .runner
                .run(&command, self.config.stage_timeout_secs, workdir)
                .await
            {
                Ok(output) => output.passed(),
                Err(e) => {
                    warn!(stage = %target, error = %e, "rollback command failed");
                    false
                }
            }
        };

        obs::emit_stage_rolled_back(failed.name(), Some(target.name()), completed);
        RollbackRecord {
            failed_stage: failed,
            target_stage: Some(target),
            command: Some(command),
            completed,
        }
    }
}

fn unmet_dependency(step: &StepDefinition, results: &[StageResult]) -> Option<PipelineStage> {
    step.dependencies.iter().copied().find(|dep| {
        !results
            .iter()
            .any(|r| r.stage == *dep && r.status == StageStatus::Success)
    })
}
