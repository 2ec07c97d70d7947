//! Static keyword tables and the scoring helpers built on them.
//!
//! The validator and the optimizer both score descriptions through these
//! functions so their mode and topology suggestions cannot drift apart.
//! All matching is case-insensitive substring containment.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Complexity, ExecutionMode, RequiredElement, Topology, TopologyDecision};

const REQUIRED_ELEMENT_PATTERNS: [(RequiredElement, &str); 5] = [
    (RequiredElement::Users, r"users?|audience|target|who"),
    (RequiredElement::Goal, r"goal|objective|purpose|problem|solve"),
    (RequiredElement::Inputs, r"input|data|source|feed"),
    (RequiredElement::Outputs, r"output|produce|result|deliver"),
    (RequiredElement::Runtime, r"runtime|deploy|environment|local|cloud"),
];

pub const SIMPLE_KEYWORDS: &[&str] = &[
    "simple",
    "basic",
    "single",
    "one",
    "individual",
    "personal",
    "task",
    "todo",
    "list",
    "note",
    "calculator",
];

pub const COMPLEX_KEYWORDS: &[&str] = &[
    "comprehensive",
    "enterprise",
    "distributed",
    "microservices",
    "real-time",
    "machine learning",
    "ai",
    "analytics",
    "dashboard",
    "multi-user",
    "scalable",
    "high-performance",
    "production",
];

pub const PARALLEL_INDICATORS: &[&str] = &[
    "microservices",
    "distributed",
    "real-time",
    "analytics",
    "dashboard",
    "multiple",
    "integration",
    "api",
];

/// Complexity-count thresholds.
const COMPLEX_THRESHOLD: usize = 3;
const SIMPLE_THRESHOLD: usize = 2;
const PARALLEL_THRESHOLD: usize = 2;

const MAX_SWARM_AGENTS: u32 = 8;
const BASE_SWARM_AGENTS: u32 = 5;
const HIVE_AGENTS: u32 = 3;

static REQUIRED_ELEMENTS: LazyLock<Vec<(RequiredElement, Regex)>> = LazyLock::new(|| {
    REQUIRED_ELEMENT_PATTERNS
        .iter()
        .map(|(element, pattern)| {
            let re = Regex::new(pattern).expect("required element pattern is valid");
            (*element, re)
        })
        .collect()
});

static TECHNICAL_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"technical|architecture|framework").expect("technical pattern is valid")
});

static VAGUENESS_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"something|anything|whatever").expect("vagueness pattern is valid")
});

/// Keywords that vote for each execution mode.
pub fn mode_keywords(mode: ExecutionMode) -> &'static [&'static str] {
    match mode {
        ExecutionMode::Architect => &[
            "architecture",
            "system design",
            "microservices",
            "distributed",
            "scalable",
        ],
        ExecutionMode::Api => &["api", "backend", "service", "rest", "endpoint"],
        ExecutionMode::Ui => &["frontend", "interface", "web", "mobile", "dashboard"],
        ExecutionMode::Ml => &[
            "machine learning",
            "ai",
            "prediction",
            "model",
            "data science",
        ],
        ExecutionMode::Tdd => &["test", "testing", "quality", "tdd", "bdd"],
        ExecutionMode::Devops => &["deploy", "ci/cd", "docker", "kubernetes", "infrastructure"],
    }
}

/// Number of distinct keywords contained in `text_lower`.
pub fn count_hits(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text_lower.contains(*k)).count()
}

/// Required elements matched by the description, in reporting order.
pub fn matched_elements(text: &str) -> Vec<RequiredElement> {
    let lower = text.to_lowercase();
    REQUIRED_ELEMENTS
        .iter()
        .filter(|(_, re)| re.is_match(&lower))
        .map(|(element, _)| *element)
        .collect()
}

pub fn mentions_technical_vocabulary(text: &str) -> bool {
    TECHNICAL_VOCABULARY.is_match(&text.to_lowercase())
}

pub fn mentions_vagueness(text: &str) -> bool {
    VAGUENESS_MARKERS.is_match(&text.to_lowercase())
}

/// Classify complexity from simple/complex keyword counts.
///
/// Complex wins at three complex hits; otherwise two simple hits mean simple;
/// everything else is medium.
pub fn assess_complexity(text: &str) -> Complexity {
    let lower = text.to_lowercase();
    let simple = count_hits(&lower, SIMPLE_KEYWORDS);
    let complex = count_hits(&lower, COMPLEX_KEYWORDS);

    if complex >= COMPLEX_THRESHOLD {
        Complexity::Complex
    } else if simple >= SIMPLE_THRESHOLD {
        Complexity::Simple
    } else {
        Complexity::Medium
    }
}

/// Highest-scoring execution mode; `Architect` when nothing matches.
pub fn suggest_mode(text: &str) -> ExecutionMode {
    let lower = text.to_lowercase();
    let mut best = ExecutionMode::Architect;
    let mut best_score = 0;

    for mode in ExecutionMode::ALL {
        let score = count_hits(&lower, mode_keywords(mode));
        if score > best_score {
            best = mode;
            best_score = score;
        }
    }

    best
}

/// Choose topology and agent count for the given complexity.
pub fn suggest_topology(complexity: Complexity, text: &str) -> TopologyDecision {
    let lower = text.to_lowercase();
    let parallel_hits = count_hits(&lower, PARALLEL_INDICATORS);
    let rank = complexity.rank();

    let (topology, agent_count) =
        if complexity == Complexity::Complex || parallel_hits >= PARALLEL_THRESHOLD {
            (Topology::Swarm, MAX_SWARM_AGENTS.min(BASE_SWARM_AGENTS + rank))
        } else if complexity == Complexity::Medium {
            (Topology::Swarm, BASE_SWARM_AGENTS)
        } else {
            (Topology::Hive, HIVE_AGENTS)
        };

    TopologyDecision {
        topology,
        agent_count,
        reasoning: format!(
            "Complexity: {}, Parallel indicators: {}",
            rank, parallel_hits
        ),
    }
}
