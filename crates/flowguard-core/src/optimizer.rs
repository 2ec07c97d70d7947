//! Resource optimizer: turns a description and complexity hint into a
//! time / memory / agent budget and a four-phase execution plan.
//!
//! Clarity, mode and topology are re-derived here with the same keyword
//! helpers [`crate::InputValidator`] uses, so both engines agree on every
//! input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attention::{AttentionCatalog, AttentionPriority, AttentionTarget};
use crate::domain::{
    AgentAllocation, Complexity, ExecutionMode, MemoryAllocation, PlanPhase, PlanPhaseKind,
    RequiredElement, ResourceAllocation, ResourcePlan, TimeAllocation, Topology, TopologyDecision,
};
use crate::error::{CoreError, Result};
use crate::keywords;

/// Base run time before complexity and clarity scaling.
pub const BASE_TIME_SECS: f64 = 300.0;

/// Clarity below this adds clarification recommendations.
pub const CLARIFICATION_THRESHOLD: f64 = 0.6;

const VALIDATION_PHASE_SECS: u64 = 60;
const PLANNING_PHASE_SECS: u64 = 120;
const TESTING_PHASE_SECS: u64 = 120;
const FIXED_PHASE_SECS: u64 = 180;
const TESTING_AGENTS: u32 = 2;
const MEMORY_RESERVE_MB: u64 = 512;
const MAX_COMPLEXITY_SCORE: f64 = 10.0;

/// Intermediate analysis behind a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationAnalysis {
    pub clarity_score: f64,
    pub suggested_mode: ExecutionMode,
    pub topology: TopologyDecision,
    pub recommendations: Vec<String>,
    /// Per-run top targets; the catalog itself is left untouched.
    pub priorities: Vec<AttentionTarget>,
    /// Strategy steps for each prioritized target that has any.
    pub strategies: BTreeMap<String, Vec<String>>,
}

/// Values the pipeline substitutes into its step commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationParameters {
    pub mode: ExecutionMode,
    pub topology: Topology,
    pub agent_count: u32,
    pub timeout_secs: u64,
    pub memory_limit_mb: u64,
    pub complexity_threshold: f64,
}

/// Full output of [`ResourceOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    pub analysis: OptimizationAnalysis,
    pub parameters: OptimizationParameters,
    pub plan: ResourcePlan,
}

/// Computes resource plans against an [`AttentionCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct ResourceOptimizer<'c> {
    catalog: &'c AttentionCatalog,
}

impl Default for ResourceOptimizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceOptimizer<'static> {
    /// Optimizer backed by the shared process-wide catalog.
    pub fn new() -> Self {
        Self {
            catalog: AttentionCatalog::shared(),
        }
    }
}

impl<'c> ResourceOptimizer<'c> {
    pub fn with_catalog(catalog: &'c AttentionCatalog) -> Self {
        Self { catalog }
    }

    /// Build the plan for one run.
    ///
    /// Deterministic for identical inputs. Fails on a blank description or
    /// when the plan would exceed the catalog's agent or memory limits.
    pub fn optimize(&self, description: &str, complexity: Complexity) -> Result<Optimization> {
        if description.trim().is_empty() {
            return Err(CoreError::EmptyDescription);
        }

        let limits = self.catalog.limits();
        let clarity_score = clarity_score(description);
        let suggested_mode = keywords::suggest_mode(description);
        let topology = keywords::suggest_topology(complexity, description);
        let agent_count = topology.agent_count;

        if agent_count > limits.agents.max_agents {
            warn!(
                requested = agent_count,
                limit = limits.agents.max_agents,
                "agent count exceeds limit"
            );
            return Err(CoreError::ResourceLimitExceeded {
                resource: "agents".to_string(),
                requested: u64::from(agent_count),
                limit: u64::from(limits.agents.max_agents),
            });
        }

        let memory_mb = u64::from(agent_count) * limits.memory.per_agent_mb;
        if memory_mb > limits.memory.total_mb {
            warn!(
                requested = memory_mb,
                limit = limits.memory.total_mb,
                "memory requirement exceeds limit"
            );
            return Err(CoreError::ResourceLimitExceeded {
                resource: "memory_mb".to_string(),
                requested: memory_mb,
                limit: limits.memory.total_mb,
            });
        }

        let unclear = 1.0 - clarity_score;
        let estimated_time_secs =
            (BASE_TIME_SECS * complexity.time_multiplier() * (1.0 + unclear)) as u64;
        let complexity_score =
            MAX_COMPLEXITY_SCORE.min(f64::from(agent_count) * 1.5 + unclear * 3.0);

        let parameters = OptimizationParameters {
            mode: suggested_mode,
            topology: topology.topology,
            agent_count,
            timeout_secs: estimated_time_secs,
            memory_limit_mb: memory_mb,
            complexity_threshold: complexity_score,
        };

        let plan = ResourcePlan {
            estimated_time_secs,
            memory_mb,
            complexity_score,
            agent_count,
            execution_plan: execution_plan(&parameters),
            allocation: allocate(&parameters),
        };

        let priorities = self.catalog.prioritize(clarity_score, complexity);
        let strategies = priorities
            .iter()
            .filter_map(|target| {
                let steps = self.catalog.strategies(&target.name);
                (!steps.is_empty()).then(|| {
                    let steps = steps.iter().map(|s| s.to_string()).collect();
                    (target.name.clone(), steps)
                })
            })
            .collect();

        let analysis = OptimizationAnalysis {
            clarity_score,
            suggested_mode,
            recommendations: recommendations(clarity_score, suggested_mode, topology.topology),
            topology,
            priorities,
            strategies,
        };

        debug!(
            clarity = clarity_score,
            mode = %suggested_mode,
            agents = agent_count,
            time_secs = estimated_time_secs,
            "resource plan computed"
        );

        Ok(Optimization {
            analysis,
            parameters,
            plan,
        })
    }
}

/// Fraction of required elements present, nudged by technical vocabulary
/// (+0.1) and vagueness markers (-0.1), clamped to `[0, 1]`.
pub fn clarity_score(description: &str) -> f64 {
    let found = keywords::matched_elements(description).len() as f64;
    let mut score = found / RequiredElement::ALL.len() as f64;
    if keywords::mentions_technical_vocabulary(description) {
        score += 0.1;
    }
    if keywords::mentions_vagueness(description) {
        score -= 0.1;
    }
    score.clamp(0.0, 1.0)
}

fn recommendations(clarity: f64, mode: ExecutionMode, topology: Topology) -> Vec<String> {
    let mut out = Vec::new();
    if clarity < CLARIFICATION_THRESHOLD {
        out.push("Request clarification for missing project elements".to_string());
        out.push("Suggest specific technical requirements".to_string());
    }

    match mode {
        ExecutionMode::Architect => {
            out.push("Focus on system architecture and design patterns".to_string())
        }
        ExecutionMode::Api => {
            out.push("Prioritize API design and backend implementation".to_string())
        }
        ExecutionMode::Ui => {
            out.push("Focus on user interface and frontend development".to_string())
        }
        _ => {}
    }

    out.push(match topology {
        Topology::Swarm => "Optimize for parallel processing and agent coordination".to_string(),
        Topology::Hive => "Focus on sequential task execution and agent efficiency".to_string(),
    });
    out
}

fn implementation_secs(total_secs: u64) -> u64 {
    total_secs.saturating_sub(FIXED_PHASE_SECS)
}

fn execution_plan(params: &OptimizationParameters) -> Vec<PlanPhase> {
    vec![
        PlanPhase {
            phase: PlanPhaseKind::Validation,
            description: "Validate idea clarity and structure".to_string(),
            priority: AttentionPriority::Critical,
            estimated_time_secs: VALIDATION_PHASE_SECS,
            agents_required: 1,
        },
        PlanPhase {
            phase: PlanPhaseKind::Planning,
            description: format!("Create implementation plan using {} mode", params.mode),
            priority: AttentionPriority::Critical,
            estimated_time_secs: PLANNING_PHASE_SECS,
            agents_required: params.agent_count,
        },
        PlanPhase {
            phase: PlanPhaseKind::Implementation,
            description: format!("Implement project using {} topology", params.topology),
            priority: AttentionPriority::High,
            estimated_time_secs: implementation_secs(params.timeout_secs),
            agents_required: params.agent_count,
        },
        PlanPhase {
            phase: PlanPhaseKind::Testing,
            description: "Validate implementation and run tests".to_string(),
            priority: AttentionPriority::High,
            estimated_time_secs: TESTING_PHASE_SECS,
            agents_required: TESTING_AGENTS,
        },
    ]
}

fn allocate(params: &OptimizationParameters) -> ResourceAllocation {
    let n = params.agent_count;
    ResourceAllocation {
        agents: AgentAllocation {
            total: n,
            critical: n * 6 / 10,
            high: n * 3 / 10,
            monitoring: n / 10,
        },
        memory: MemoryAllocation {
            total_mb: params.memory_limit_mb,
            per_agent_mb: params.memory_limit_mb / u64::from(n.max(1)),
            reserve_mb: MEMORY_RESERVE_MB,
        },
        time: TimeAllocation {
            total_secs: params.timeout_secs,
            validation_secs: VALIDATION_PHASE_SECS,
            planning_secs: PLANNING_PHASE_SECS,
            implementation_secs: implementation_secs(params.timeout_secs),
            testing_secs: TESTING_PHASE_SECS,
        },
    }
}
