//! Contradiction detection between a description and implementation output.
//!
//! Three independent checks feed one list:
//! - regex rules over the implementation output
//! - technology compatibility between both texts
//! - architecture constraints required by the description
//!
//! All rule tables are built once per process.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::domain::{
    Contradiction, ContradictionType, DetectionSource, Resolution, Severity, SeverityDistribution,
};

struct PatternRule {
    kind: ContradictionType,
    regex: Regex,
    description: &'static str,
}

const PATTERN_TABLE: &[(ContradictionType, &str, &str)] = &[
    (
        ContradictionType::ArchitectureMismatch,
        r"microservices.*monolith|monolith.*microservices",
        "Architecture style mismatch",
    ),
    (
        ContradictionType::ArchitectureMismatch,
        r"serverless.*stateful|stateful.*serverless",
        "State management contradiction",
    ),
    (
        ContradictionType::TechnologyConflict,
        r"python.*node\.js.*same.*service",
        "Multiple languages in single service",
    ),
    (
        ContradictionType::TechnologyConflict,
        r"sql.*nosql.*same.*data",
        "Database type conflict",
    ),
    (
        ContradictionType::RequirementViolation,
        r"real-time.*batch.*processing",
        "Processing mode contradiction",
    ),
    (
        ContradictionType::RequirementViolation,
        r"high-availability.*single.*point.*failure",
        "Availability requirement violation",
    ),
    (
        ContradictionType::PerformanceIssue,
        r"high-performance.*interpreted.*language",
        "Performance expectation mismatch",
    ),
    (
        ContradictionType::PerformanceIssue,
        r"low-latency.*network.*call",
        "Latency expectation contradiction",
    ),
    (
        ContradictionType::SecurityViolation,
        r"secure.*plain.*text.*password",
        "Security practice violation",
    ),
    (
        ContradictionType::SecurityViolation,
        r"authentication.*no.*auth",
        "Authentication requirement violation",
    ),
    (
        ContradictionType::ScalabilityProblem,
        r"scalable.*single.*server",
        "Scalability architecture contradiction",
    ),
    (
        ContradictionType::ScalabilityProblem,
        r"distributed.*centralized.*database",
        "Distribution contradiction",
    ),
];

static PATTERN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|(kind, pattern, description)| PatternRule {
            kind: *kind,
            regex: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("contradiction pattern is valid"),
            description: *description,
        })
        .collect()
});

const TECHNOLOGIES: &[&str] = &[
    "python",
    "nodejs",
    "react",
    "angular",
    "vue",
    "java",
    "golang",
    "rust",
    "postgresql",
    "mongodb",
    "redis",
    "mysql",
    "sqlite",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "express",
    "fastapi",
    "django",
    "flask",
    "spring",
];

const COMPATIBILITY: &[(&str, &[&str])] = &[
    ("python", &["fastapi", "django", "flask", "postgresql", "redis"]),
    ("nodejs", &["express", "nestjs", "mongodb", "redis", "postgresql"]),
    ("react", &["typescript", "javascript", "nodejs", "express"]),
    (
        "microservices",
        &["docker", "kubernetes", "api-gateway", "service-mesh"],
    ),
    (
        "serverless",
        &["aws-lambda", "azure-functions", "stateless", "event-driven"],
    ),
    (
        "real-time",
        &["websockets", "server-sent-events", "polling"],
    ),
    (
        "high-performance",
        &["golang", "rust", "c++", "compiled-languages"],
    ),
];

const ARCHITECTURES: &[&str] = &[
    "microservices",
    "monolith",
    "serverless",
    "real-time",
    "high-availability",
    "scalable",
    "distributed",
    "centralized",
];

const ARCHITECTURE_CONSTRAINTS: &[(&str, &[&str])] = &[
    (
        "microservices",
        &["distributed", "api-gateway", "service-discovery"],
    ),
    ("monolith", &["single-deployment", "shared-database"]),
    ("serverless", &["stateless", "event-driven", "auto-scaling"]),
    (
        "real-time",
        &["websockets", "low-latency", "persistent-connections"],
    ),
    (
        "high-availability",
        &["redundancy", "load-balancing", "failover"],
    ),
    (
        "distributed",
        &["replication", "load-balancing", "service-discovery"],
    ),
    ("scalable", &["auto-scaling", "load-balancing"]),
];

const TECHNOLOGY_ACTION: &str = "Review and align technology choices";
const ARCHITECTURE_ACTION: &str = "Add missing architecture components";

/// Keywords from `table` that occur in `text`, in table order.
fn extract<'t>(text: &str, table: &[&'t str]) -> Vec<&'t str> {
    let lower = text.to_lowercase();
    table
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect()
}

/// Symmetric lookup in the compatibility table.
pub fn are_compatible(a: &str, b: &str) -> bool {
    COMPATIBILITY.iter().any(|(tech, partners)| {
        (*tech == a && partners.contains(&b)) || (*tech == b && partners.contains(&a))
    })
}

fn required_components(architecture: &str) -> &'static [&'static str] {
    ARCHITECTURE_CONSTRAINTS
        .iter()
        .find(|(name, _)| *name == architecture)
        .map(|(_, components)| *components)
        .unwrap_or(&[])
}

/// Detects contradictions and decides whether they force a rollback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContradictionEngine;

impl ContradictionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Every contradiction between `description` and `output`.
    ///
    /// Pattern hits come first, then technology conflicts, then
    /// architecture mismatches.
    pub fn detect(&self, description: &str, output: &str) -> Vec<Contradiction> {
        let mut found = self.pattern_contradictions(output);
        found.extend(self.technology_contradictions(description, output));
        found.extend(self.architecture_contradictions(description, output));
        found
    }

    fn pattern_contradictions(&self, output: &str) -> Vec<Contradiction> {
        PATTERN_RULES
            .iter()
            .filter(|rule| rule.regex.is_match(output))
            .map(|rule| Contradiction {
                kind: rule.kind,
                severity: rule.kind.default_severity(),
                description: rule.description.to_string(),
                detected_in: DetectionSource::ImplementationOutput,
                expected: "Consistent architecture and technology choices".to_string(),
                actual: format!("Found: {}", rule.regex.as_str()),
                rollback_action: rule.kind.rollback_action().to_string(),
            })
            .collect()
    }

    fn technology_contradictions(&self, description: &str, output: &str) -> Vec<Contradiction> {
        let wanted = extract(description, TECHNOLOGIES);
        let used = extract(output, TECHNOLOGIES);

        let mut found = Vec::new();
        for a in &wanted {
            for b in &used {
                if a == b || are_compatible(a, b) {
                    continue;
                }
                found.push(Contradiction {
                    kind: ContradictionType::TechnologyConflict,
                    severity: Severity::Medium,
                    description: format!("Incompatible technologies: {a} and {b}"),
                    detected_in: DetectionSource::TechnologyAnalysis,
                    expected: format!("Compatible technology stack with {a}"),
                    actual: format!("Found incompatible {b}"),
                    rollback_action: TECHNOLOGY_ACTION.to_string(),
                });
            }
        }
        found
    }

    fn architecture_contradictions(&self, description: &str, output: &str) -> Vec<Contradiction> {
        let required = extract(description, ARCHITECTURES);
        let present = extract(output, ARCHITECTURES);
        let output_lower = output.to_lowercase();

        required
            .into_iter()
            .filter(|arch| !present.contains(arch))
            .filter_map(|arch| {
                let components = required_components(arch);
                let missing: Vec<&str> = components
                    .iter()
                    .copied()
                    .filter(|c| !output_lower.contains(c))
                    .collect();
                if missing.is_empty() {
                    return None;
                }
                Some(Contradiction {
                    kind: ContradictionType::ArchitectureMismatch,
                    severity: Severity::High,
                    description: format!("Missing architecture components for {arch}"),
                    detected_in: DetectionSource::ArchitectureAnalysis,
                    expected: format!(
                        "Architecture {arch} with components: {}",
                        components.join(", ")
                    ),
                    actual: format!("Missing: {}", missing.join(", ")),
                    rollback_action: ARCHITECTURE_ACTION.to_string(),
                })
            })
            .collect()
    }

    /// Detect, then summarize into a rollback decision.
    ///
    /// Rollback is required on any critical contradiction or on two or more
    /// high ones.
    pub fn resolve(&self, description: &str, output: &str) -> Resolution {
        let contradictions = self.detect(description, output);
        let severity_distribution = SeverityDistribution::from_contradictions(&contradictions);
        let needs_rollback = needs_rollback(&severity_distribution);
        let corrective_actions = corrective_actions(&contradictions);

        debug!(
            count = contradictions.len(),
            critical = severity_distribution.critical,
            high = severity_distribution.high,
            needs_rollback,
            "contradictions resolved"
        );

        Resolution {
            count: contradictions.len(),
            severity_distribution,
            needs_rollback,
            contradictions,
            corrective_actions,
            can_proceed: !needs_rollback,
        }
    }
}

pub fn needs_rollback(distribution: &SeverityDistribution) -> bool {
    distribution.count(Severity::Critical) >= 1 || distribution.count(Severity::High) >= 2
}

/// One line per contradiction: `CRITICAL:` for high and critical,
/// `WARNING:` otherwise.
pub fn corrective_actions(contradictions: &[Contradiction]) -> Vec<String> {
    contradictions
        .iter()
        .map(|c| {
            let prefix = if c.severity >= Severity::High {
                "CRITICAL"
            } else {
                "WARNING"
            };
            format!("{prefix}: {}", c.rollback_action)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contradiction(severity: Severity) -> Contradiction {
        Contradiction {
            kind: ContradictionType::PerformanceIssue,
            severity,
            description: "test".to_string(),
            detected_in: DetectionSource::ImplementationOutput,
            expected: String::new(),
            actual: String::new(),
            rollback_action: "Do it".to_string(),
        }
    }

    #[test]
    fn test_no_contradictions_can_proceed() {
        let resolution = ContradictionEngine::new().resolve(
            "A recipe box for home cooks",
            "Created recipe storage and search",
        );
        assert_eq!(resolution.count, 0);
        assert!(!resolution.needs_rollback);
        assert!(resolution.can_proceed);
        assert_eq!(resolution.severity_distribution, SeverityDistribution::default());
    }

    #[test]
    fn test_pattern_rule_is_case_insensitive() {
        let found = ContradictionEngine::new().detect(
            "",
            "Designed as MICROSERVICES but shipped as a Monolith",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ContradictionType::ArchitectureMismatch);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[0].detected_in, DetectionSource::ImplementationOutput);
    }

    #[test]
    fn test_pattern_does_not_cross_lines() {
        let found = ContradictionEngine::new().detect("", "microservices\nmonolith");
        assert!(found.is_empty());
    }

    #[test]
    fn test_single_critical_forces_rollback() {
        let resolution = ContradictionEngine::new().resolve(
            "",
            "Stores user passwords; secure storage uses plain text password columns",
        );
        assert_eq!(resolution.severity_distribution.critical, 1);
        assert!(resolution.needs_rollback);
        assert!(!resolution.can_proceed);
        assert_eq!(
            resolution.corrective_actions,
            vec!["CRITICAL: Rollback to security review stage".to_string()]
        );
    }

    #[test]
    fn test_technology_conflicts() {
        let found = ContradictionEngine::new().detect(
            "Use python with postgresql",
            "Implemented with django, mongodb and postgresql",
        );
        // postgresql pairs with python only
        let conflicts: Vec<&str> = found.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(
            conflicts,
            vec![
                "Incompatible technologies: python and mongodb",
                "Incompatible technologies: postgresql and mongodb",
                "Incompatible technologies: postgresql and django",
            ]
        );
        assert!(found
            .iter()
            .all(|c| c.kind == ContradictionType::TechnologyConflict
                && c.severity == Severity::Medium));
    }

    #[test]
    fn test_compatibility_is_symmetric() {
        assert!(are_compatible("python", "django"));
        assert!(are_compatible("django", "python"));
        assert!(!are_compatible("django", "mongodb"));
    }

    #[test]
    fn test_architecture_keyword_in_output_is_satisfied() {
        let found = ContradictionEngine::new().detect(
            "A scalable service",
            "Built a scalable service behind a queue",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_architecture_components_satisfy_constraint() {
        let found = ContradictionEngine::new().detect(
            "A scalable service",
            "Configured auto-scaling and load-balancing",
        );
        assert!(found.is_empty());

        let found = ContradictionEngine::new().detect(
            "A scalable service",
            "Configured auto-scaling only",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].actual, "Missing: load-balancing");
    }

    #[test]
    fn test_analytics_platform_forces_rollback() {
        let resolution = ContradictionEngine::new().resolve(
            "A real-time analytics platform on distributed infrastructure",
            "Created a Python-based analytics platform using Django and SQLite. \
             Batch processing. Single server deployment.",
        );
        assert_eq!(resolution.severity_distribution.high, 2);
        assert!(resolution
            .contradictions
            .iter()
            .all(|c| c.kind == ContradictionType::ArchitectureMismatch));
        assert!(resolution.needs_rollback);
    }

    #[test]
    fn test_rollback_thresholds() {
        let one_high = SeverityDistribution::from_contradictions(&[contradiction(Severity::High)]);
        assert!(!needs_rollback(&one_high));

        let two_high = SeverityDistribution::from_contradictions(&[
            contradiction(Severity::High),
            contradiction(Severity::High),
        ]);
        assert!(needs_rollback(&two_high));

        let mixed = SeverityDistribution::from_contradictions(&[
            contradiction(Severity::Critical),
            contradiction(Severity::Low),
        ]);
        assert!(needs_rollback(&mixed));
    }

    #[test]
    fn test_corrective_action_prefixes() {
        let actions = corrective_actions(&[
            contradiction(Severity::Critical),
            contradiction(Severity::High),
            contradiction(Severity::Medium),
            contradiction(Severity::Low),
        ]);
        assert_eq!(
            actions,
            vec![
                "CRITICAL: Do it",
                "CRITICAL: Do it",
                "WARNING: Do it",
                "WARNING: Do it"
            ]
        );
    }
}
