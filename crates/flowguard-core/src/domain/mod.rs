//! Domain models for flowguard.
//!
//! Canonical definitions for the values passed between engines:
//! - `ValidationResult`: structural verdict on a description
//! - `ResourcePlan`: time / memory / agent budget
//! - `Contradiction` and `Resolution`: intent-versus-output checks

pub mod complexity;
pub mod contradiction;
pub mod plan;
pub mod validation;

pub use complexity::{Complexity, ExecutionMode, Topology, TopologyDecision};
pub use contradiction::{
    Contradiction, ContradictionType, DetectionSource, Resolution, Severity, SeverityDistribution,
};
pub use plan::{
    AgentAllocation, MemoryAllocation, PlanPhase, PlanPhaseKind, ResourceAllocation,
    ResourcePlan, TimeAllocation,
};
pub use validation::{RequiredElement, ValidationResult};
