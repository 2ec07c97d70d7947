//! End-to-end orchestration: validate, plan, execute, check contradictions.
//!
//! `Orchestrator::orchestrate` is the single boundary where every engine
//! error becomes a structured [`RunResult`]; nothing escapes to the caller.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use flowguard_core::obs;
use flowguard_core::{
    AttentionCatalog, Complexity, ContradictionEngine, InputValidator, Optimization, Resolution,
    ResourceOptimizer, ValidationResult,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::PipelineError;
use crate::pipeline::{PipelineExecutor, PipelineOutput};
use crate::runner::CommandRunner;
use crate::stage::PipelineStage;

/// Orchestration step at which a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStage {
    #[serde(rename = "bbmc_validation")]
    Validation,
    #[serde(rename = "bbam_optimization")]
    Optimization,
    #[serde(rename = "bbpf_execution")]
    Execution,
    #[serde(rename = "bbcr_validation")]
    ContradictionCheck,
    #[serde(rename = "rollback")]
    Rollback,
    #[serde(rename = "completed")]
    Completed,
}

impl RunStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStage::Validation => "bbmc_validation",
            RunStage::Optimization => "bbam_optimization",
            RunStage::Execution => "bbpf_execution",
            RunStage::ContradictionCheck => "bbcr_validation",
            RunStage::Rollback => "rollback",
            RunStage::Completed => "completed",
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the top-level rollback handled one corrective action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollbackDirective {
    /// Project directory removed.
    Cleanup { action: String, path: PathBuf },
    /// Restart requested; the caller decides whether to re-run.
    Restart { action: String },
    Acknowledged { action: String },
}

/// Outcome of the contradiction-triggered rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackReport {
    pub corrective_actions: Vec<String>,
    pub directives: Vec<RollbackDirective>,
    pub completed: bool,
    pub error: Option<String>,
}

/// Everything the engines produced before the run ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunData {
    pub validation: Option<ValidationResult>,
    pub optimization: Option<Optimization>,
    pub pipeline: Option<PipelineOutput>,
    pub contradictions: Option<Resolution>,
    pub rollback: Option<RollbackReport>,
}

/// Terminal artifact of one orchestration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub success: bool,
    pub stage: RunStage,
    pub message: String,
    pub data: RunData,
    pub execution_time_secs: f64,
    pub rollback_needed: bool,
}

/// Sequences validator, optimizer, pipeline and contradiction engine.
#[derive(Clone)]
pub struct Orchestrator {
    validator: InputValidator,
    catalog: Option<Arc<AttentionCatalog>>,
    executor: PipelineExecutor,
    contradictions: ContradictionEngine,
}

struct RunContext {
    run_id: String,
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, config: RunConfig) -> Self {
        Self {
            validator: InputValidator::new(),
            catalog: None,
            executor: PipelineExecutor::new(runner, config),
            contradictions: ContradictionEngine::new(),
        }
    }

    /// Plan against a custom catalog instead of the shared one.
    pub fn with_catalog(mut self, catalog: Arc<AttentionCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    fn optimizer(&self) -> ResourceOptimizer<'_> {
        match &self.catalog {
            Some(catalog) => ResourceOptimizer::with_catalog(catalog),
            None => ResourceOptimizer::with_catalog(AttentionCatalog::shared()),
        }
    }

    /// Run one project end to end.
    pub async fn orchestrate(
        &self,
        project: &str,
        description: &str,
        complexity: Complexity,
    ) -> RunResult {
        let ctx = RunContext {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            clock: Instant::now(),
        };
        let span = obs::run_span(&ctx.run_id);

        async {
            obs::emit_orchestration_started(&ctx.run_id, project, complexity.as_str());
            let result = self.run(&ctx, project, description, complexity).await;
            obs::emit_orchestration_finished(
                &ctx.run_id,
                result.stage.as_str(),
                result.success,
                (result.execution_time_secs * 1000.0) as u64,
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        ctx: &RunContext,
        project: &str,
        description: &str,
        complexity: Complexity,
    ) -> RunResult {
        let mut data = RunData::default();

        let validation = self.validator.validate(description);
        if !validation.valid {
            let missing: Vec<&str> = validation
                .missing_elements
                .iter()
                .map(|e| e.as_str())
                .collect();
            let message = format!(
                "Idea validation failed. Missing elements: {}",
                missing.join(", ")
            );
            data.validation = Some(validation);
            return finish(ctx, RunStage::Validation, false, message, data, false);
        }
        info!(complexity = %validation.complexity, "idea validated");
        data.validation = Some(validation);

        let optimization = match self.optimizer().optimize(description, complexity) {
            Ok(optimization) => optimization,
            Err(e) => {
                let message = format!("Resource optimization failed: {e}");
                return finish(ctx, RunStage::Optimization, false, message, data, false);
            }
        };
        let params = optimization.parameters.clone();
        data.optimization = Some(optimization);

        let output = match self
            .executor
            .execute(project, description, Some(&params))
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let message = format!("Pipeline execution error: {e}");
                return finish(ctx, RunStage::Execution, false, message, data, true);
            }
        };

        if !output.succeeded() {
            let message = match output.halted_at {
                Some(stage) => format!("Pipeline execution failed at stage {stage}"),
                None => "Pipeline execution failed".to_string(),
            };
            data.pipeline = Some(output);
            return finish(ctx, RunStage::Execution, false, message, data, true);
        }

        let implementation_output = match output.stdout_of(PipelineStage::Implementation) {
            Some(stdout) => stdout.to_string(),
            None => {
                let err = PipelineError::MissingStageOutput(PipelineStage::Implementation);
                data.pipeline = Some(output);
                let message = format!("Contradiction check error: {err}");
                return finish(ctx, RunStage::ContradictionCheck, false, message, data, true);
            }
        };
        let project_dir = output.project_dir.clone();
        data.pipeline = Some(output);

        let resolution = self.contradictions.resolve(description, &implementation_output);
        obs::emit_contradictions_resolved(
            resolution.count,
            resolution.severity_distribution.critical,
            resolution.severity_distribution.high,
            resolution.needs_rollback,
        );

        if resolution.needs_rollback {
            let report = handle_rollback(&resolution.corrective_actions, &project_dir).await;
            let message = if report.completed {
                format!(
                    "Contradictions detected ({}); rollback completed",
                    resolution.count
                )
            } else {
                format!(
                    "Contradictions detected ({}); rollback failed",
                    resolution.count
                )
            };
            let success = report.completed;
            data.contradictions = Some(resolution);
            data.rollback = Some(report);
            return finish(ctx, RunStage::Rollback, success, message, data, false);
        }

        data.contradictions = Some(resolution);
        finish(
            ctx,
            RunStage::Completed,
            true,
            "Orchestration completed successfully".to_string(),
            data,
            false,
        )
    }
}

fn finish(
    ctx: &RunContext,
    stage: RunStage,
    success: bool,
    message: String,
    data: RunData,
    rollback_needed: bool,
) -> RunResult {
    if !success {
        warn!(stage = %stage, message = %message, "orchestration stopped");
    }
    RunResult {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at,
        success,
        stage,
        message,
        data,
        execution_time_secs: ctx.clock.elapsed().as_secs_f64(),
        rollback_needed,
    }
}

/// Dispatch corrective actions that ask for a rollback.
///
/// "cleanup" removes the project directory (a missing directory is fine),
/// "restart" is recorded for the caller; anything else is acknowledged.
pub async fn handle_rollback(actions: &[String], project_dir: &Path) -> RollbackReport {
    let mut directives = Vec::new();
    let mut error = None;

    for action in actions {
        let lower = action.to_lowercase();
        if !lower.contains("rollback") {
            continue;
        }

        if lower.contains("cleanup") {
            match tokio::fs::remove_dir_all(project_dir).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %project_dir.display(), error = %e, "cleanup failed");
                    error = Some(format!("cleanup of {} failed: {e}", project_dir.display()));
                    break;
                }
            }
            directives.push(RollbackDirective::Cleanup {
                action: action.clone(),
                path: project_dir.to_path_buf(),
            });
        } else if lower.contains("restart") {
            directives.push(RollbackDirective::Restart {
                action: action.clone(),
            });
        } else {
            directives.push(RollbackDirective::Acknowledged {
                action: action.clone(),
            });
        }
    }

    RollbackReport {
        corrective_actions: actions.to_vec(),
        directives,
        completed: error.is_none(),
        error,
    }
}
