//! Run configuration, read from `FLOWGUARD_*` environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

pub const ENV_WORKSPACE_ROOT: &str = "FLOWGUARD_WORKSPACE_ROOT";
pub const ENV_STAGE_TIMEOUT_SECS: &str = "FLOWGUARD_STAGE_TIMEOUT_SECS";
pub const ENV_FLOW_COMMAND: &str = "FLOWGUARD_FLOW_COMMAND";
pub const ENV_CHECKER_COMMAND: &str = "FLOWGUARD_CHECKER_COMMAND";
pub const ENV_SHELL: &str = "FLOWGUARD_SHELL";

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Parent directory for per-project workspaces.
    pub workspace_root: PathBuf,
    pub stage_timeout_secs: u64,
    /// Executable that performs analysis, planning and implementation.
    pub flow_command: String,
    /// Command that validates `idea.txt` in the Validation stage.
    pub checker_command: String,
    pub shell: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::temp_dir(),
            stage_timeout_secs: 300,
            flow_command: "claude-flow".to_string(),
            checker_command: "flowguard check".to_string(),
            shell: "sh".to_string(),
        }
    }
}

impl RunConfig {
    /// Read the configuration from the process environment.
    ///
    /// Reads:
    /// - FLOWGUARD_WORKSPACE_ROOT (default: system temp dir)
    /// - FLOWGUARD_STAGE_TIMEOUT_SECS (default: 300)
    /// - FLOWGUARD_FLOW_COMMAND (default: "claude-flow")
    /// - FLOWGUARD_CHECKER_COMMAND (default: "flowguard check")
    /// - FLOWGUARD_SHELL (default: "sh")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`RunConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup(ENV_WORKSPACE_ROOT) {
            config.workspace_root = PathBuf::from(root);
        }
        if let Some(raw) = lookup(ENV_STAGE_TIMEOUT_SECS) {
            config.stage_timeout_secs = raw.trim().parse().map_err(|_| {
                PipelineError::Config(format!("{ENV_STAGE_TIMEOUT_SECS} must be a number, got {raw:?}"))
            })?;
        }
        if let Some(flow) = lookup(ENV_FLOW_COMMAND) {
            config.flow_command = flow;
        }
        if let Some(checker) = lookup(ENV_CHECKER_COMMAND) {
            config.checker_command = checker;
        }
        if let Some(shell) = lookup(ENV_SHELL) {
            config.shell = shell;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn with_stage_timeout(mut self, secs: u64) -> Self {
        self.stage_timeout_secs = secs;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.flow_command.trim().is_empty() {
            return Err(PipelineError::Config(format!("{ENV_FLOW_COMMAND} is empty")));
        }
        if self.checker_command.trim().is_empty() {
            return Err(PipelineError::Config(format!("{ENV_CHECKER_COMMAND} is empty")));
        }
        if self.shell.trim().is_empty() {
            return Err(PipelineError::Config(format!("{ENV_SHELL} is empty")));
        }
        Ok(())
    }
}
