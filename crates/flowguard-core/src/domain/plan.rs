//! Resource plan produced by the optimizer.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::attention::AttentionPriority;
use crate::error::Result;

/// Fixed phases of the execution plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPhaseKind {
    Validation,
    Planning,
    Implementation,
    Testing,
}

/// One entry of the ordered execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub phase: PlanPhaseKind,
    pub description: String,
    pub priority: AttentionPriority,
    pub estimated_time_secs: u64,
    pub agents_required: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAllocation {
    pub total: u32,
    pub critical: u32,
    pub high: u32,
    pub monitoring: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAllocation {
    pub total_mb: u64,
    pub per_agent_mb: u64,
    pub reserve_mb: u64,
}

/// Per-phase time budget in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAllocation {
    pub total_secs: u64,
    pub validation_secs: u64,
    pub planning_secs: u64,
    pub implementation_secs: u64,
    pub testing_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub agents: AgentAllocation,
    pub memory: MemoryAllocation,
    pub time: TimeAllocation,
}

/// Time / memory / agent budget for one orchestration run.
///
/// Derived entirely from the description and complexity hint; recomputed on
/// every run and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePlan {
    pub estimated_time_secs: u64,
    pub memory_mb: u64,
    pub complexity_score: f64,
    pub agent_count: u32,
    pub execution_plan: Vec<PlanPhase>,
    pub allocation: ResourceAllocation,
}

impl ResourcePlan {
    /// SHA-256 hex digest of the plan's canonical JSON encoding.
    pub fn digest(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&json);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Look up a phase by kind.
    pub fn phase(&self, kind: PlanPhaseKind) -> Option<&PlanPhase> {
        self.execution_plan.iter().find(|p| p.phase == kind)
    }
}
