//! Structural validation result for a project description.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::complexity::{Complexity, ExecutionMode, Topology};

/// The five structural elements a usable description should mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredElement {
    Users,
    Goal,
    Inputs,
    Outputs,
    Runtime,
}

impl RequiredElement {
    /// All elements in reporting order.
    pub const ALL: [RequiredElement; 5] = [
        RequiredElement::Users,
        RequiredElement::Goal,
        RequiredElement::Inputs,
        RequiredElement::Outputs,
        RequiredElement::Runtime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredElement::Users => "users",
            RequiredElement::Goal => "goal",
            RequiredElement::Inputs => "inputs",
            RequiredElement::Outputs => "outputs",
            RequiredElement::Runtime => "runtime",
        }
    }

    /// Fixed advice emitted when this element is missing.
    pub fn recommendation(&self) -> &'static str {
        match self {
            RequiredElement::Users => "Specify target users/audience for better scope definition",
            RequiredElement::Goal => "Define clear problem/goal to solve",
            RequiredElement::Inputs => "Describe data sources and inputs needed",
            RequiredElement::Outputs => "Specify expected outputs and deliverables",
            RequiredElement::Runtime => "Mention deployment environment (local/cloud)",
        }
    }
}

impl fmt::Display for RequiredElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`crate::InputValidator::validate`].
///
/// Created once per orchestration run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` iff at least three of the five required elements were found.
    pub valid: bool,
    pub complexity: Complexity,
    /// Unmatched elements, in [`RequiredElement::ALL`] order.
    pub missing_elements: Vec<RequiredElement>,
    pub recommendations: Vec<String>,
    pub suggested_mode: ExecutionMode,
    pub suggested_topology: Topology,
    pub estimated_agents: u32,
}

impl ValidationResult {
    /// Number of required elements the description covers.
    pub fn found_count(&self) -> usize {
        RequiredElement::ALL.len() - self.missing_elements.len()
    }
}
