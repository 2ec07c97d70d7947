//! Errors for command execution and pipeline setup.

use std::path::PathBuf;

use crate::stage::PipelineStage;

/// Failure to run a command at all (as opposed to a non-zero exit).
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("command is empty")]
    EmptyCommand,

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error while running command: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot prepare project workspace {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no output recorded for stage {0}")]
    MissingStageOutput(PipelineStage),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
