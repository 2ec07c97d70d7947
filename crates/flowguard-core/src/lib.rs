//! flowguard core engines.
//!
//! Leaf-first:
//! - `attention`: static catalog of optimization targets and resource limits
//! - `validator`: structural completeness and complexity of a description
//! - `optimizer`: time / memory / agent plan for a run
//! - `contradiction`: intent-versus-output checks and rollback decision
//!
//! The engines are pure and synchronous; process execution lives in
//! `flowguard-pipeline`.

pub mod attention;
pub mod contradiction;
pub mod domain;
pub mod error;
pub mod keywords;
pub mod obs;
pub mod optimizer;
pub mod telemetry;
pub mod validator;

pub use attention::{
    AttentionCatalog, AttentionPriority, AttentionTarget, ResourceLimits, ResourceType,
};
pub use contradiction::ContradictionEngine;
pub use domain::{
    Complexity, Contradiction, ContradictionType, DetectionSource, ExecutionMode, PlanPhase,
    PlanPhaseKind, RequiredElement, Resolution, ResourcePlan, Severity, SeverityDistribution,
    Topology, TopologyDecision, ValidationResult,
};
pub use error::{CoreError, Result};
pub use optimizer::{Optimization, OptimizationAnalysis, OptimizationParameters, ResourceOptimizer};
pub use telemetry::init_tracing;
pub use validator::InputValidator;
