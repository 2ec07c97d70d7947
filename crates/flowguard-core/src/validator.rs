//! Structural validation of project descriptions.

use tracing::debug;

use crate::domain::{Complexity, RequiredElement, ValidationResult};
use crate::keywords;

/// Minimum number of required elements for a description to be usable.
pub const MIN_FOUND_ELEMENTS: usize = 3;

const SIMPLE_ADVICE: &str = "Consider adding more technical details for better implementation";
const COMPLEX_ADVICE: &str =
    "Consider breaking down into smaller components for better manageability";

/// Scores a description's completeness and complexity.
///
/// Stateless; every call is a pure function of the description and the
/// keyword tables in [`crate::keywords`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, description: &str) -> ValidationResult {
        if description.trim().is_empty() {
            debug!("empty description, reporting every element as missing");
        }

        let found = keywords::matched_elements(description);
        let missing_elements: Vec<RequiredElement> = RequiredElement::ALL
            .into_iter()
            .filter(|e| !found.contains(e))
            .collect();

        let complexity = keywords::assess_complexity(description);
        let topology = keywords::suggest_topology(complexity, description);

        let mut recommendations: Vec<String> = missing_elements
            .iter()
            .map(|e| e.recommendation().to_string())
            .collect();
        match complexity {
            Complexity::Simple => recommendations.push(SIMPLE_ADVICE.to_string()),
            Complexity::Complex => recommendations.push(COMPLEX_ADVICE.to_string()),
            Complexity::Medium => {}
        }

        let result = ValidationResult {
            valid: found.len() >= MIN_FOUND_ELEMENTS,
            complexity,
            missing_elements,
            recommendations,
            suggested_mode: keywords::suggest_mode(description),
            suggested_topology: topology.topology,
            estimated_agents: topology.agent_count,
        };

        debug!(
            valid = result.valid,
            complexity = %result.complexity,
            found = found.len(),
            "description validated"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExecutionMode, Topology};

    const TASK_MANAGER: &str = "Build a task manager for individual users. Users: students. \
        Goal: organize tasks. Inputs: task text. Outputs: task list. Runtime: local.";

    #[test]
    fn test_task_manager_is_valid_and_simple() {
        let result = InputValidator::new().validate(TASK_MANAGER);
        assert!(result.valid);
        assert!(result.missing_elements.is_empty());
        assert_eq!(result.complexity, Complexity::Simple);
        assert_eq!(result.suggested_topology, Topology::Hive);
        assert_eq!(result.estimated_agents, 3);
        assert_eq!(result.recommendations, vec![SIMPLE_ADVICE.to_string()]);
    }

    #[test]
    fn test_empty_description() {
        for input in ["", "   \n\t"] {
            let result = InputValidator::new().validate(input);
            assert!(!result.valid);
            assert_eq!(result.missing_elements, RequiredElement::ALL.to_vec());
            assert_eq!(result.suggested_mode, ExecutionMode::Architect);
        }
    }

    #[test]
    fn test_two_elements_is_invalid() {
        let result = InputValidator::new().validate("Goal: track budgets. Runtime: cloud.");
        assert!(!result.valid);
        assert_eq!(result.found_count(), 2);
        assert_eq!(
            result.missing_elements,
            vec![
                RequiredElement::Users,
                RequiredElement::Inputs,
                RequiredElement::Outputs
            ]
        );
        assert!(result
            .recommendations
            .contains(&"Describe data sources and inputs needed".to_string()));
    }

    #[test]
    fn test_exactly_three_elements_is_valid() {
        let result = InputValidator::new().validate("Users: chefs. Goal: plan menus. Runtime: cloud.");
        assert!(result.valid);
        assert_eq!(result.found_count(), 3);
    }

    #[test]
    fn test_complex_description_gets_decomposition_advice() {
        let idea = "A distributed microservices platform with real-time updates. \
            Users: traders. Goal: price alerts. Inputs: market feed. \
            Outputs: notifications. Runtime: cloud.";
        let result = InputValidator::new().validate(idea);
        assert!(result.valid);
        assert_eq!(result.complexity, Complexity::Complex);
        assert_eq!(result.suggested_topology, Topology::Swarm);
        assert!((5..=8).contains(&result.estimated_agents));
        assert_eq!(result.recommendations.last().unwrap(), COMPLEX_ADVICE);
    }
}
