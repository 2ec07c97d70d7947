//! flowguard - staged orchestration for project descriptions
//!
//! ## Commands
//!
//! - `run`: validate, plan, execute the staged pipeline and check the result
//! - `check`: validate a project description
//! - `plan`: print the resource optimization for a description

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flowguard_core::{Complexity, InputValidator, ResourceOptimizer, ValidationResult};
use flowguard_pipeline::config::{
    ENV_CHECKER_COMMAND, ENV_FLOW_COMMAND, ENV_SHELL, ENV_STAGE_TIMEOUT_SECS, ENV_WORKSPACE_ROOT,
};
use flowguard_pipeline::{
    generate_script, CommandRunner, Orchestrator, RunConfig, RunResult, ShellCommandRunner,
};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "flowguard")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate, plan and run staged project pipelines", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full orchestration for one project
    Run {
        /// Project name; also the workspace directory name
        #[arg(short, long)]
        project: String,

        /// Project description
        #[arg(short, long)]
        idea: String,

        #[arg(short, long, default_value = "medium", value_parser = parse_complexity)]
        complexity: Complexity,

        /// Print a bash script for the finished run instead of the summary
        #[arg(long)]
        generate_script: bool,

        /// Print the full run result as JSON
        #[arg(long, conflicts_with = "generate_script")]
        json_result: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Validate a project description
    Check {
        #[arg(short, long, required_unless_present = "idea_file", conflicts_with = "idea_file")]
        idea: Option<String>,

        /// Read the description from a file
        #[arg(long)]
        idea_file: Option<PathBuf>,
    },

    /// Print the resource optimization for a description as JSON
    Plan {
        #[arg(short, long)]
        idea: String,

        #[arg(short, long, default_value = "medium", value_parser = parse_complexity)]
        complexity: Complexity,
    },
}

/// Overrides for [`RunConfig`]; unset flags keep the environment value.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Parent directory for project workspaces
    #[arg(long, env = ENV_WORKSPACE_ROOT)]
    workspace_root: Option<PathBuf>,

    /// Per-stage timeout in seconds
    #[arg(long, env = ENV_STAGE_TIMEOUT_SECS, value_parser = parse_timeout)]
    stage_timeout: Option<u64>,

    /// Executable used for analysis, planning and implementation
    #[arg(long, env = ENV_FLOW_COMMAND)]
    flow_command: Option<String>,

    /// Command that validates idea.txt
    #[arg(long, env = ENV_CHECKER_COMMAND)]
    checker_command: Option<String>,

    /// Shell used to run stage commands
    #[arg(long, env = ENV_SHELL)]
    shell: Option<String>,
}

impl ConfigArgs {
    fn resolve(self) -> Result<RunConfig> {
        let mut config = RunConfig::from_env().context("Invalid flowguard configuration")?;
        if let Some(root) = self.workspace_root {
            config.workspace_root = root;
        }
        if let Some(secs) = self.stage_timeout {
            config.stage_timeout_secs = secs;
        }
        if let Some(flow) = self.flow_command {
            config.flow_command = flow;
        }
        if let Some(checker) = self.checker_command {
            config.checker_command = checker;
        }
        if let Some(shell) = self.shell {
            config.shell = shell;
        }
        Ok(config)
    }
}

fn parse_complexity(raw: &str) -> Result<Complexity, String> {
    raw.parse().map_err(|e: flowguard_core::CoreError| e.to_string())
}

/// Same rule as `RunConfig::from_env`: surrounding whitespace is ignored.
fn parse_timeout(raw: &str) -> Result<u64, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("stage timeout must be a number of seconds, got {raw:?}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutput {
    Summary,
    Script,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    flowguard_core::init_tracing(cli.json, level);

    let ok = match cli.command {
        Commands::Run {
            project,
            idea,
            complexity,
            generate_script,
            json_result,
            config,
        } => {
            let config = config.resolve()?;
            debug!(?config, "resolved run configuration");
            let runner: Arc<dyn CommandRunner> =
                Arc::new(ShellCommandRunner::new(config.shell.clone()));
            let output = if generate_script {
                RunOutput::Script
            } else if json_result {
                RunOutput::Json
            } else {
                RunOutput::Summary
            };
            cmd_run(runner, config, &project, &idea, complexity, output).await?
        }
        Commands::Check { idea, idea_file } => cmd_check(idea, idea_file.as_deref())?,
        Commands::Plan { idea, complexity } => cmd_plan(&idea, complexity)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn cmd_run(
    runner: Arc<dyn CommandRunner>,
    config: RunConfig,
    project: &str,
    idea: &str,
    complexity: Complexity,
    output: RunOutput,
) -> Result<bool> {
    let orchestrator = Orchestrator::new(runner, config);
    let result = orchestrator.orchestrate(project, idea, complexity).await;

    match output {
        RunOutput::Script => print!("{}", generate_script(project, idea, complexity, &result)),
        RunOutput::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize run result")?
        ),
        RunOutput::Summary => print!("{}", render_summary(&result)),
    }

    Ok(result.success)
}

fn render_summary(result: &RunResult) -> String {
    let status = if result.success {
        "✓ SUCCESS"
    } else {
        "✗ FAILED"
    };
    let mut summary = format!(
        "Run ID:   {}\nStatus:   {}\nStage:    {}\nMessage:  {}\nElapsed:  {:.2}s\nRollback: {}\n",
        result.run_id,
        status,
        result.stage,
        result.message,
        result.execution_time_secs,
        if result.rollback_needed {
            "needed"
        } else {
            "not needed"
        },
    );
    if let Some(pipeline) = &result.data.pipeline {
        summary.push_str(&format!(
            "Stages:   {} passed, {} failed\n",
            pipeline.passed_count(),
            pipeline.failed_count()
        ));
    }
    summary
}

fn cmd_check(idea: Option<String>, idea_file: Option<&std::path::Path>) -> Result<bool> {
    let description = match (idea, idea_file) {
        (Some(idea), _) => idea,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read idea file {}", path.display()))?,
        (None, None) => anyhow::bail!("Either --idea or --idea-file is required"),
    };

    let validation = InputValidator::new().validate(&description);
    print!("{}", render_report(&validation));
    Ok(validation.valid)
}

/// Plain-text validation report; the last line is `is_valid: <bool>`.
fn render_report(validation: &ValidationResult) -> String {
    let mut report = String::new();
    report.push_str(&format!("complexity: {}\n", validation.complexity));
    report.push_str(&format!(
        "suggested_mode: {}\n",
        validation.suggested_mode.as_str()
    ));
    report.push_str(&format!(
        "suggested_topology: {}\n",
        validation.suggested_topology.as_str()
    ));
    report.push_str(&format!(
        "estimated_agents: {}\n",
        validation.estimated_agents
    ));

    if !validation.missing_elements.is_empty() {
        let missing: Vec<&str> = validation
            .missing_elements
            .iter()
            .map(|e| e.as_str())
            .collect();
        report.push_str(&format!("missing_elements: {}\n", missing.join(", ")));
    }
    if !validation.recommendations.is_empty() {
        report.push_str("recommendations:\n");
        for rec in &validation.recommendations {
            report.push_str(&format!("  - {rec}\n"));
        }
    }

    report.push_str(&format!("is_valid: {}\n", validation.valid));
    report
}

fn cmd_plan(idea: &str, complexity: Complexity) -> Result<bool> {
    let optimization = ResourceOptimizer::new()
        .optimize(idea, complexity)
        .context("Resource optimization failed")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&optimization).context("Failed to serialize plan")?
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowguard_pipeline::fakes::ScriptedRunner;

    const IDEA: &str = "Build a task manager for individual users. Users: students. \
        Goal: organize tasks. Inputs: task text. Outputs: task list. Runtime: local.";

    #[test]
    fn test_run_arguments_parse() {
        let cli = Cli::try_parse_from([
            "flowguard",
            "--json",
            "run",
            "--project",
            "tasks",
            "--idea",
            IDEA,
            "--complexity",
            "complex",
            "--stage-timeout",
            "30",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Run {
                project,
                complexity,
                generate_script,
                config,
                ..
            } => {
                assert_eq!(project, "tasks");
                assert_eq!(complexity, Complexity::Complex);
                assert!(!generate_script);
                assert_eq!(config.stage_timeout, Some(30));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_stage_timeout_accepts_padding() {
        assert_eq!(parse_timeout(" 45 "), Ok(45));
        assert!(parse_timeout("soon").is_err());

        let cli = Cli::try_parse_from([
            "flowguard", "run", "--project", "tasks", "--idea", IDEA, "--stage-timeout", " 45 ",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { config, .. } => assert_eq!(config.stage_timeout, Some(45)),
            _ => panic!("expected run"),
        }
    }

    #[tokio::test]
    async fn test_summary_counts_stages() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            Arc::new(ScriptedRunner::passing_pipeline()),
            RunConfig::default().with_workspace_root(dir.path()),
        );
        let result = orchestrator
            .orchestrate("tasks", IDEA, Complexity::Simple)
            .await;

        let summary = render_summary(&result);
        assert!(summary.contains("Status:   ✓ SUCCESS"));
        assert!(summary.contains("Stages:   6 passed, 0 failed"));
    }

    #[test]
    fn test_unknown_complexity_is_rejected() {
        let parsed = Cli::try_parse_from([
            "flowguard", "plan", "--idea", IDEA, "--complexity", "extreme",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_check_requires_a_source() {
        assert!(Cli::try_parse_from(["flowguard", "check"]).is_err());
        assert!(Cli::try_parse_from(["flowguard", "check", "--idea-file", "idea.txt"]).is_ok());
    }

    #[test]
    fn test_report_ends_with_verdict() {
        let report = render_report(&InputValidator::new().validate(IDEA));
        assert!(report.contains("estimated_agents: 3"));
        assert!(report.trim_end().ends_with("is_valid: true"));

        let report = render_report(&InputValidator::new().validate("something cool"));
        assert!(report.contains("missing_elements: users"));
        assert!(report.trim_end().ends_with("is_valid: false"));
    }

    #[test]
    fn test_check_reads_idea_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idea.txt");
        std::fs::write(&path, IDEA).unwrap();

        assert!(cmd_check(None, Some(&path)).unwrap());
        assert!(cmd_check(None, Some(&dir.path().join("missing.txt"))).is_err());
    }

    #[tokio::test]
    async fn test_cmd_run_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::default().with_workspace_root(dir.path());
        let runner = Arc::new(ScriptedRunner::passing_pipeline());

        let ok = cmd_run(
            runner,
            config,
            "tasks",
            IDEA,
            Complexity::Simple,
            RunOutput::Summary,
        )
        .await
        .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_cmd_run_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::default().with_workspace_root(dir.path());
        let runner = Arc::new(ScriptedRunner::passing_pipeline());

        let ok = cmd_run(
            runner,
            config,
            "vague",
            "something cool",
            Complexity::Medium,
            RunOutput::Script,
        )
        .await
        .unwrap();
        assert!(!ok);
    }
}
