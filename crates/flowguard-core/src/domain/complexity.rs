//! Complexity, execution mode and topology vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Coarse project complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }

    /// Numeric rank used by topology sizing (simple=1, medium=2, complex=3).
    pub fn rank(&self) -> u32 {
        match self {
            Complexity::Simple => 1,
            Complexity::Medium => 2,
            Complexity::Complex => 3,
        }
    }

    /// Multiplier applied to the base time estimate.
    pub fn time_multiplier(&self) -> f64 {
        match self {
            Complexity::Simple => 1.0,
            Complexity::Medium => 1.5,
            Complexity::Complex => 2.5,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "medium" => Ok(Complexity::Medium),
            "complex" => Ok(Complexity::Complex),
            other => Err(CoreError::UnknownComplexity(other.to_string())),
        }
    }
}

/// Execution mode handed to the flow tool (`<flow> sparc <mode>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Architect,
    Api,
    Ui,
    Ml,
    Tdd,
    Devops,
}

impl ExecutionMode {
    /// All modes in tie-break order.
    pub const ALL: [ExecutionMode; 6] = [
        ExecutionMode::Architect,
        ExecutionMode::Api,
        ExecutionMode::Ui,
        ExecutionMode::Ml,
        ExecutionMode::Tdd,
        ExecutionMode::Devops,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Architect => "architect",
            ExecutionMode::Api => "api",
            ExecutionMode::Ui => "ui",
            ExecutionMode::Ml => "ml",
            ExecutionMode::Tdd => "tdd",
            ExecutionMode::Devops => "devops",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution shape: parallel swarm or sequential hive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    Swarm,
    Hive,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Swarm => "swarm",
            Topology::Hive => "hive",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topology choice with the agent count it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDecision {
    pub topology: Topology,
    pub agent_count: u32,
    pub reasoning: String,
}
