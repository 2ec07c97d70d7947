//! Output checks applied to a stage's stdout after a zero exit.

use serde::{Deserialize, Serialize};

use crate::stage::PipelineStage;

/// Substrings that mark output as failed when no stage check applies.
pub const ERROR_INDICATORS: [&str; 4] = ["error", "failed", "exception", "timeout"];

/// Minimum trimmed length of a believable analysis.
const MIN_ANALYSIS_LEN: usize = 100;

/// Stage-specific output check. All comparisons are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPredicate {
    /// Output contains `is_valid: true`.
    ValidationPassed,
    /// Longer than 100 characters and mentions `architecture`.
    ArchitectureAnalysis,
    /// Mentions `plan` or `steps`.
    PlanPresent,
    /// Mentions `created` or `generated`.
    ArtifactsCreated,
    /// Mentions `passed` or `success`.
    TestsPassed,
    /// Mentions `deployed` or `running`.
    DeploymentLive,
    /// Contains none of [`ERROR_INDICATORS`].
    NoErrorIndicators,
}

impl OutputPredicate {
    pub fn for_stage(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::Validation => OutputPredicate::ValidationPassed,
            PipelineStage::Analysis => OutputPredicate::ArchitectureAnalysis,
            PipelineStage::Planning => OutputPredicate::PlanPresent,
            PipelineStage::Implementation => OutputPredicate::ArtifactsCreated,
            PipelineStage::Testing => OutputPredicate::TestsPassed,
            PipelineStage::Deployment => OutputPredicate::DeploymentLive,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputPredicate::ValidationPassed => "validation_passed",
            OutputPredicate::ArchitectureAnalysis => "architecture_analysis",
            OutputPredicate::PlanPresent => "plan_present",
            OutputPredicate::ArtifactsCreated => "artifacts_created",
            OutputPredicate::TestsPassed => "tests_passed",
            OutputPredicate::DeploymentLive => "deployment_live",
            OutputPredicate::NoErrorIndicators => "no_error_indicators",
        }
    }

    pub fn check(&self, output: &str) -> bool {
        let lower = output.to_lowercase();
        let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        match self {
            OutputPredicate::ValidationPassed => lower.contains("is_valid: true"),
            OutputPredicate::ArchitectureAnalysis => {
                output.trim().chars().count() > MIN_ANALYSIS_LEN && lower.contains("architecture")
            }
            OutputPredicate::PlanPresent => any(&["plan", "steps"]),
            OutputPredicate::ArtifactsCreated => any(&["created", "generated"]),
            OutputPredicate::TestsPassed => any(&["passed", "success"]),
            OutputPredicate::DeploymentLive => any(&["deployed", "running"]),
            OutputPredicate::NoErrorIndicators => !any(&ERROR_INDICATORS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_distinct_predicate() {
        let mut names: Vec<&str> = PipelineStage::ALL
            .iter()
            .map(|s| OutputPredicate::for_stage(*s).name())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_validation_passed() {
        assert!(OutputPredicate::ValidationPassed.check("complexity: simple\nIS_VALID: TRUE\n"));
        assert!(!OutputPredicate::ValidationPassed.check("is_valid: false"));
    }

    #[test]
    fn test_architecture_analysis_needs_length() {
        let short = "Architecture: layered";
        assert!(!OutputPredicate::ArchitectureAnalysis.check(short));

        let long = format!("Proposed architecture: {}", "hexagonal core with adapters ".repeat(5));
        assert!(OutputPredicate::ArchitectureAnalysis.check(&long));

        let padded = format!("{}architecture{}", " ".repeat(100), " ".repeat(100));
        assert!(!OutputPredicate::ArchitectureAnalysis.check(&padded));
    }

    #[test]
    fn test_keyword_predicates() {
        assert!(OutputPredicate::PlanPresent.check("Next Steps: 1. scaffold"));
        assert!(OutputPredicate::ArtifactsCreated.check("Generated 4 files"));
        assert!(!OutputPredicate::ArtifactsCreated.check("nothing to do"));
        assert!(OutputPredicate::TestsPassed.check("12 tests PASSED"));
        assert!(OutputPredicate::DeploymentLive.check("service is running on :8080"));
    }

    #[test]
    fn test_no_error_indicators() {
        assert!(OutputPredicate::NoErrorIndicators.check("all good"));
        for bad in ["Error: boom", "build FAILED", "NullPointerException", "request timeout"] {
            assert!(!OutputPredicate::NoErrorIndicators.check(bad), "{bad}");
        }
    }
}
