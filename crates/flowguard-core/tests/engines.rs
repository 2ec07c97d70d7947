//! End-to-end checks across the three pure engines.

use flowguard_core::{
    Complexity, ContradictionEngine, ContradictionType, InputValidator, ResourceOptimizer,
    Severity, Topology,
};

const TASK_MANAGER: &str = "Build a task manager for individual users. Users: students. \
    Goal: organize tasks. Inputs: task text. Outputs: task list. Runtime: local.";

const TRADING_DESK: &str = "A distributed microservices trading desk with real-time quotes. \
    Users: traders. Goal: faster execution. Inputs: exchange feeds. \
    Outputs: order confirmations. Runtime: cloud.";

#[test]
fn task_manager_runs_as_small_hive() {
    let validation = InputValidator::new().validate(TASK_MANAGER);
    assert!(validation.valid);
    assert!(matches!(
        validation.complexity,
        Complexity::Simple | Complexity::Medium
    ));
    assert_eq!(validation.suggested_topology, Topology::Hive);
    assert_eq!(validation.estimated_agents, 3);

    let optimization = ResourceOptimizer::new()
        .optimize(TASK_MANAGER, validation.complexity)
        .unwrap();
    assert_eq!(optimization.plan.agent_count, 3);
    assert_eq!(optimization.parameters.topology, Topology::Hive);
}

#[test]
fn complex_idea_runs_as_swarm() {
    let validation = InputValidator::new().validate(TRADING_DESK);
    assert!(validation.valid);
    assert_eq!(validation.complexity, Complexity::Complex);
    assert_eq!(validation.suggested_topology, Topology::Swarm);

    let optimization = ResourceOptimizer::new()
        .optimize(TRADING_DESK, Complexity::Complex)
        .unwrap();
    assert!((5..=8).contains(&optimization.plan.agent_count));
    // validator and optimizer agree on topology
    assert_eq!(
        optimization.analysis.topology.agent_count,
        validation.estimated_agents
    );
}

#[test]
fn adding_complex_keywords_never_downgrades() {
    let validator = InputValidator::new();
    let mut text = String::from("a basic todo list");
    let mut previous = validator.validate(&text).complexity.rank();

    for word in ["enterprise", "analytics", "production", "scalable"] {
        text.push(' ');
        text.push_str(word);
        let rank = validator.validate(&text).complexity.rank();
        assert!(rank >= previous, "{text} downgraded complexity");
        previous = rank;
    }
    assert_eq!(previous, Complexity::Complex.rank());
}

#[test]
fn batch_output_contradicts_realtime_distributed_idea() {
    let idea = "Real-time distributed analytics. Users: ops. Goal: alerting. \
        Inputs: metrics. Outputs: pages. Runtime: cloud.";
    let output = "Created a Python-based analytics platform using Django and SQLite. \
        Batch processing. Single server deployment.";

    let resolution = ContradictionEngine::new().resolve(idea, output);
    assert!(resolution.needs_rollback);
    assert!(!resolution.can_proceed);
    assert!(resolution.contradictions.iter().any(|c| {
        (c.kind == ContradictionType::RequirementViolation && c.severity == Severity::Critical)
            || (c.kind == ContradictionType::ArchitectureMismatch && c.severity == Severity::High)
    }));
    assert!(resolution
        .corrective_actions
        .iter()
        .all(|a| a.starts_with("CRITICAL:")));
}
