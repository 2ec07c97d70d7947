//! Contradictions between a description and the produced implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a detected inconsistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    ArchitectureMismatch,
    TechnologyConflict,
    RequirementViolation,
    PerformanceIssue,
    SecurityViolation,
    ScalabilityProblem,
}

impl ContradictionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContradictionType::ArchitectureMismatch => "architecture_mismatch",
            ContradictionType::TechnologyConflict => "technology_conflict",
            ContradictionType::RequirementViolation => "requirement_violation",
            ContradictionType::PerformanceIssue => "performance_issue",
            ContradictionType::SecurityViolation => "security_violation",
            ContradictionType::ScalabilityProblem => "scalability_problem",
        }
    }

    /// Severity assigned to pattern matches of this type.
    pub fn default_severity(&self) -> Severity {
        match self {
            ContradictionType::ArchitectureMismatch => Severity::High,
            ContradictionType::TechnologyConflict => Severity::Medium,
            ContradictionType::RequirementViolation => Severity::Critical,
            ContradictionType::PerformanceIssue => Severity::High,
            ContradictionType::SecurityViolation => Severity::Critical,
            ContradictionType::ScalabilityProblem => Severity::High,
        }
    }

    /// Corrective action suggested for pattern matches of this type.
    pub fn rollback_action(&self) -> &'static str {
        match self {
            ContradictionType::ArchitectureMismatch => "Rollback to previous architecture decision",
            ContradictionType::TechnologyConflict => "Review and align technology stack",
            ContradictionType::RequirementViolation => "Rollback to requirement validation stage",
            ContradictionType::PerformanceIssue => "Optimize or change technology choice",
            ContradictionType::SecurityViolation => "Rollback to security review stage",
            ContradictionType::ScalabilityProblem => "Reconsider architecture for scalability",
        }
    }
}

impl fmt::Display for ContradictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contradiction severity, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check produced a contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    ImplementationOutput,
    TechnologyAnalysis,
    ArchitectureAnalysis,
}

/// A single detected inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    #[serde(rename = "type")]
    pub kind: ContradictionType,
    pub severity: Severity,
    pub description: String,
    pub detected_in: DetectionSource,
    pub expected: String,
    pub actual: String,
    pub rollback_action: String,
}

/// Count of contradictions per severity (all four keys always present).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityDistribution {
    pub fn from_contradictions(contradictions: &[Contradiction]) -> Self {
        let mut dist = Self::default();
        for c in contradictions {
            match c.severity {
                Severity::Low => dist.low += 1,
                Severity::Medium => dist.medium += 1,
                Severity::High => dist.high += 1,
                Severity::Critical => dist.critical += 1,
            }
        }
        dist
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }
}

/// Verdict returned by [`crate::ContradictionEngine::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub count: usize,
    pub severity_distribution: SeverityDistribution,
    pub needs_rollback: bool,
    pub contradictions: Vec<Contradiction>,
    pub corrective_actions: Vec<String>,
    pub can_proceed: bool,
}
