//! Bash script rendering for finished runs.
//!
//! A successful run yields a replay script; a failed one yields a script that
//! reports the failure with troubleshooting hints for the stage it hit.

use flowguard_core::Complexity;

use crate::orchestrator::{RunResult, RunStage};
use crate::runner::shell_quote;

fn troubleshooting(stage: RunStage) -> &'static [&'static str] {
    match stage {
        RunStage::Validation => &[
            "Improve idea clarity and completeness",
            "Add the missing elements: users, goal, inputs, outputs, runtime",
        ],
        RunStage::Optimization => &[
            "Review the project complexity setting",
            "Check available system resources",
        ],
        RunStage::Execution => &[
            "Check that the flow tool is installed and on PATH",
            "Verify system resources and the per-stage timeout",
        ],
        RunStage::ContradictionCheck | RunStage::Rollback => &[
            "Review the implementation output against the idea",
            "Align technology and architecture choices with the requirements",
        ],
        RunStage::Completed => &[],
    }
}

/// Render the script for `result`.
pub fn generate_script(
    project: &str,
    description: &str,
    complexity: Complexity,
    result: &RunResult,
) -> String {
    if result.success {
        success_script(project, description, complexity, result)
    } else {
        error_script(project, result)
    }
}

fn header(project: &str, result: &RunResult) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         # flowguard script for {project}\n\
         # run {run_id} started {started}\n\
         set -euo pipefail\n\n",
        project = project.replace('\n', " "),
        run_id = result.run_id,
        started = result.started_at.to_rfc3339(),
    )
}

fn success_script(
    project: &str,
    description: &str,
    complexity: Complexity,
    result: &RunResult,
) -> String {
    let mut script = header(project, result);
    script.push_str(&format!("PROJECT_NAME={}\n", shell_quote(project)));
    script.push_str(&format!("IDEA={}\n", shell_quote(description)));
    script.push_str(&format!("COMPLEXITY={}\n\n", complexity.as_str()));

    script.push_str("echo \"Validating idea for $PROJECT_NAME\"\n");
    script.push_str("flowguard check --idea \"$IDEA\"\n\n");
    script.push_str("echo \"Planning resources\"\n");
    script.push_str("flowguard plan --idea \"$IDEA\" --complexity \"$COMPLEXITY\"\n\n");
    script.push_str("echo \"Running pipeline\"\n");
    script.push_str(
        "flowguard run --project \"$PROJECT_NAME\" --idea \"$IDEA\" --complexity \"$COMPLEXITY\"\n",
    );
    script
}

fn error_script(project: &str, result: &RunResult) -> String {
    let mut script = header(project, result);
    script.push_str("echo 'flowguard run failed'\n");
    script.push_str(&format!(
        "echo {}\n",
        shell_quote(&format!("Stage: {}", result.stage))
    ));
    script.push_str(&format!(
        "echo {}\n",
        shell_quote(&format!("Message: {}", result.message))
    ));
    script.push_str(&format!(
        "echo {}\n",
        shell_quote(&format!(
            "Elapsed: {:.2}s",
            result.execution_time_secs
        ))
    ));
    script.push_str(&format!(
        "echo {}\n",
        shell_quote(&format!("Rollback needed: {}", result.rollback_needed))
    ));

    let hints = troubleshooting(result.stage);
    if !hints.is_empty() {
        script.push_str("echo 'Troubleshooting:'\n");
        for hint in hints {
            script.push_str(&format!("echo {}\n", shell_quote(&format!("  - {hint}"))));
        }
    }
    script.push_str("exit 1\n");
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::RunData;
    use chrono::Utc;

    fn run_result(success: bool, stage: RunStage, message: &str) -> RunResult {
        RunResult {
            run_id: "run-1".to_string(),
            started_at: Utc::now(),
            success,
            stage,
            message: message.to_string(),
            data: RunData::default(),
            execution_time_secs: 1.5,
            rollback_needed: !success,
        }
    }

    #[test]
    fn test_success_script_replays_commands() {
        let result = run_result(true, RunStage::Completed, "ok");
        let script = generate_script("notes", "Users: me. It's simple.", Complexity::Simple, &result);

        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        assert!(script.contains(r"IDEA='Users: me. It'\''s simple.'"));
        assert!(script.contains("COMPLEXITY=simple"));
        assert!(script.contains("flowguard check --idea"));
        assert!(script.contains("flowguard plan --idea"));
        assert!(script.contains("flowguard run --project \"$PROJECT_NAME\""));
        assert!(!script.contains("exit 1"));
    }

    #[test]
    fn test_error_script_reports_stage_and_hints() {
        let result = run_result(
            false,
            RunStage::Execution,
            "Pipeline execution failed at stage analysis",
        );
        let script = generate_script("notes", "idea", Complexity::Medium, &result);

        assert!(script.contains("echo 'Stage: bbpf_execution'"));
        assert!(script.contains("Pipeline execution failed at stage analysis"));
        assert!(script.contains("Elapsed: 1.50s"));
        assert!(script.contains("flow tool is installed"));
        assert!(script.trim_end().ends_with("exit 1"));
    }

    #[test]
    fn test_validation_hints() {
        let result = run_result(false, RunStage::Validation, "Missing elements: users");
        let script = generate_script("notes", "idea", Complexity::Medium, &result);
        assert!(script.contains("Improve idea clarity"));
    }
}
