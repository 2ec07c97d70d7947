//! Attention catalog: weighted optimization targets and resource limits.
//!
//! The default catalog is built once per process and shared read-only.
//! Run-time priority promotion produces a derived copy through
//! [`AttentionCatalog::prioritize`]; the catalog itself is never mutated.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::Complexity;

/// Target priority, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl AttentionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttentionPriority::Low => "low",
            AttentionPriority::Medium => "medium",
            AttentionPriority::High => "high",
            AttentionPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for AttentionPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Agents,
    Time,
    Memory,
    Complexity,
}

/// One weighted optimization target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionTarget {
    pub name: String,
    pub priority: AttentionPriority,
    pub resource_type: ResourceType,
    /// Impact on run success, in `[0, 1]`.
    pub impact_score: f64,
    pub description: String,
    pub strategy: String,
}

impl AttentionTarget {
    fn new(
        name: &str,
        priority: AttentionPriority,
        resource_type: ResourceType,
        impact_score: f64,
        description: &str,
        strategy: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            priority,
            resource_type,
            impact_score,
            description: description.to_string(),
            strategy: strategy.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLimits {
    pub max_agents: u32,
    pub min_agents: u32,
    pub optimal_min: u32,
    pub optimal_max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLimits {
    pub max_execution_secs: u64,
    pub timeout_threshold_secs: u64,
    pub optimal_duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLimits {
    pub per_agent_mb: u64,
    pub total_mb: u64,
    pub warning_threshold_mb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityLimits {
    pub max_score: u32,
    pub threshold: u32,
    pub simplification_target: u32,
}

/// Hard and soft resource limits for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub agents: AgentLimits,
    pub time: TimeLimits,
    pub memory: MemoryLimits,
    pub complexity: ComplexityLimits,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            agents: AgentLimits {
                max_agents: 8,
                min_agents: 3,
                optimal_min: 5,
                optimal_max: 7,
            },
            time: TimeLimits {
                max_execution_secs: 1800,
                timeout_threshold_secs: 1500,
                optimal_duration_secs: 900,
            },
            memory: MemoryLimits {
                per_agent_mb: 512,
                total_mb: 4096,
                warning_threshold_mb: 3072,
            },
            complexity: ComplexityLimits {
                max_score: 10,
                threshold: 7,
                simplification_target: 5,
            },
        }
    }
}

/// Clarity below this promotes `idea_clarity` to critical.
pub const CLARITY_PROMOTION_THRESHOLD: f64 = 0.7;

/// Number of targets returned by [`AttentionCatalog::prioritize`].
pub const TOP_TARGETS: usize = 5;

static DEFAULT_CATALOG: LazyLock<AttentionCatalog> = LazyLock::new(AttentionCatalog::new);

/// Static table of attention targets plus resource limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionCatalog {
    targets: Vec<AttentionTarget>,
    limits: ResourceLimits,
}

impl Default for AttentionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AttentionCatalog {
    /// Build the standard catalog.
    pub fn new() -> Self {
        Self::with_limits(ResourceLimits::default())
    }

    /// Standard targets with custom limits.
    pub fn with_limits(limits: ResourceLimits) -> Self {
        use AttentionPriority::*;
        use ResourceType::*;

        let targets = vec![
            AttentionTarget::new(
                "idea_clarity",
                Critical,
                Agents,
                0.95,
                "Clarity and completeness of user idea",
                "Validate idea structure before orchestration",
            ),
            AttentionTarget::new(
                "sparc_mode_selection",
                Critical,
                Agents,
                0.90,
                "Optimal execution mode for project type",
                "Analyze idea content for mode selection",
            ),
            AttentionTarget::new(
                "topology_optimization",
                Critical,
                Agents,
                0.85,
                "Optimal agent topology and count",
                "Match topology to project complexity",
            ),
            AttentionTarget::new(
                "agent_coordination",
                High,
                Time,
                0.75,
                "Efficient agent communication and coordination",
                "Optimize communication patterns",
            ),
            AttentionTarget::new(
                "memory_management",
                High,
                Memory,
                0.70,
                "Efficient memory usage across agents",
                "Implement memory sharing and cleanup",
            ),
            AttentionTarget::new(
                "error_handling",
                High,
                Complexity,
                0.65,
                "Robust error detection and recovery",
                "Implement comprehensive error handling",
            ),
            AttentionTarget::new(
                "progress_tracking",
                Medium,
                Time,
                0.50,
                "Real-time progress monitoring",
                "Implement progress indicators",
            ),
            AttentionTarget::new(
                "resource_monitoring",
                Medium,
                Memory,
                0.45,
                "System resource usage monitoring",
                "Monitor CPU, memory, and network usage",
            ),
            AttentionTarget::new(
                "logging",
                Low,
                Memory,
                0.25,
                "Detailed logging and debugging",
                "Implement structured logging",
            ),
            AttentionTarget::new(
                "documentation",
                Low,
                Time,
                0.20,
                "Real-time documentation generation",
                "Generate documentation as needed",
            ),
        ];

        Self { targets, limits }
    }

    /// Process-wide shared catalog.
    pub fn shared() -> &'static AttentionCatalog {
        &DEFAULT_CATALOG
    }

    pub fn targets(&self) -> &[AttentionTarget] {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&AttentionTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Optimization strategies for a target; empty for medium/low targets.
    pub fn strategies(&self, target: &str) -> &'static [&'static str] {
        match target {
            "idea_clarity" => &[
                "Validate idea structure before processing",
                "Request clarification for missing elements",
                "Suggest improvements for better implementation",
            ],
            "sparc_mode_selection" => &[
                "Analyze idea content for optimal mode",
                "Consider project complexity and requirements",
                "Match mode to project characteristics",
            ],
            "topology_optimization" => &[
                "Use swarm for complex, parallel tasks",
                "Use hive-mind for focused, sequential tasks",
                "Optimize agent count based on complexity",
            ],
            "agent_coordination" => &[
                "Implement efficient communication patterns",
                "Reduce inter-agent dependencies",
                "Optimize task distribution",
            ],
            "memory_management" => &[
                "Implement memory sharing between agents",
                "Clean up unused resources",
                "Monitor memory usage patterns",
            ],
            "error_handling" => &[
                "Implement comprehensive error detection",
                "Provide clear error messages",
                "Enable automatic recovery where possible",
            ],
            _ => &[],
        }
    }

    /// Derive the top targets for one run.
    ///
    /// Low clarity promotes `idea_clarity` and a complex project promotes
    /// `topology_optimization` to critical in a per-run copy, which is then
    /// sorted by `(priority, impact_score)` descending and cut to
    /// [`TOP_TARGETS`].
    pub fn prioritize(&self, clarity_score: f64, complexity: Complexity) -> Vec<AttentionTarget> {
        let mut derived: Vec<AttentionTarget> = self
            .targets
            .iter()
            .cloned()
            .map(|mut target| {
                let promote = (target.name == "idea_clarity"
                    && clarity_score < CLARITY_PROMOTION_THRESHOLD)
                    || (target.name == "topology_optimization"
                        && complexity == Complexity::Complex);
                if promote {
                    target.priority = AttentionPriority::Critical;
                }
                target
            })
            .collect();

        derived.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.impact_score.total_cmp(&a.impact_score))
        });
        derived.truncate(TOP_TARGETS);
        derived
    }
}
