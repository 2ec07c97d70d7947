//! Structured lifecycle events for orchestration runs.
//!
//! - `run_span` tags every log line of one run with its `run_id`
//! - `emit_*` functions log the key transitions with an `event` field
//!
//! Filter with `RUST_LOG`; pass `--json` to the CLI for NDJSON output.

use tracing::{info, info_span, warn, Span};

/// Span that tags every event of one orchestration with its `run_id`.
///
/// Attach it to the run's future with `tracing::Instrument` so it is only
/// entered while that future is polled.
pub fn run_span(run_id: &str) -> Span {
    info_span!("flowguard.run", run_id = %run_id)
}

pub fn emit_orchestration_started(run_id: &str, project: &str, complexity: &str) {
    info!(
        event = "orchestration.started",
        run_id = %run_id,
        project = %project,
        complexity = %complexity,
    );
}

pub fn emit_orchestration_finished(run_id: &str, stage: &str, success: bool, duration_ms: u64) {
    info!(
        event = "orchestration.finished",
        run_id = %run_id,
        stage = %stage,
        success = success,
        duration_ms = duration_ms,
    );
}

pub fn emit_stage_started(stage: &str, command: &str) {
    info!(event = "stage.started", stage = %stage, command = %command);
}

/// Stage outcome; failures are logged at warn level.
pub fn emit_stage_finished(stage: &str, status: &str, duration_ms: u64) {
    if status == "success" {
        info!(event = "stage.finished", stage = %stage, status = %status, duration_ms = duration_ms);
    } else {
        warn!(event = "stage.finished", stage = %stage, status = %status, duration_ms = duration_ms);
    }
}

pub fn emit_stage_rolled_back(failed_stage: &str, target_stage: Option<&str>, ok: bool) {
    warn!(
        event = "stage.rolled_back",
        failed_stage = %failed_stage,
        target_stage = target_stage.unwrap_or("none"),
        ok = ok,
    );
}

pub fn emit_contradictions_resolved(count: usize, critical: usize, high: usize, needs_rollback: bool) {
    info!(
        event = "contradictions.resolved",
        count = count,
        critical = critical,
        high = high,
        needs_rollback = needs_rollback,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let span = run_span("test-run-id");
        let _entered = span.enter();
        emit_stage_started("validation", "echo ok");
        emit_stage_finished("validation", "success", 3);
        emit_stage_rolled_back("analysis", None, true);
    }
}
