//! flowguard pipeline - staged execution and orchestration
//!
//! Provides:
//! - An ordered six-stage pipeline with dependency gating, per-stage output
//!   checks and rollback to the last good stage
//! - A pluggable external command runner (`sh -c` by default)
//! - The orchestrator that sequences validation, planning, execution and
//!   contradiction checks into one `RunResult`

pub mod config;
pub mod error;
pub mod fakes;
pub mod orchestrator;
pub mod pipeline;
pub mod predicate;
pub mod runner;
pub mod script;
pub mod stage;

pub use config::RunConfig;
pub use error::{PipelineError, Result, RunnerError};
pub use orchestrator::{
    handle_rollback, Orchestrator, RollbackDirective, RollbackReport, RunData, RunResult, RunStage,
};
pub use pipeline::{
    PipelineExecutor, PipelineOutput, PipelineState, RollbackRecord, StageResult, IDEA_FILE,
};
pub use predicate::OutputPredicate;
pub use runner::{CommandOutput, CommandRunner, ShellCommandRunner};
pub use script::generate_script;
pub use stage::{PipelineStage, StageStatus, StepDefinition};
