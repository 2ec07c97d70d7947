//! Error taxonomy for the flowguard engines.

/// Errors produced by the core engines.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("project description must not be empty")]
    EmptyDescription,

    #[error("unknown complexity: {0} (expected simple, medium or complex)")]
    UnknownComplexity(String),

    #[error("{resource} requirement of {requested} exceeds the limit of {limit}")]
    ResourceLimitExceeded {
        resource: String,
        requested: u64,
        limit: u64,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core engine operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display() {
        let err = CoreError::EmptyDescription;
        assert!(err.to_string().contains("must not be empty"));

        let err = CoreError::UnknownComplexity("huge".to_string());
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn test_resource_limit_error() {
        let err = CoreError::ResourceLimitExceeded {
            resource: "memory_mb".to_string(),
            requested: 8192,
            limit: 4096,
        };
        let msg = err.to_string();
        assert!(msg.contains("memory_mb"));
        assert!(msg.contains("8192"));
        assert!(msg.contains("4096"));
    }
}
