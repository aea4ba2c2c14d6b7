use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{Config, JenkinsConfig};
use crate::jenkins::{BuildResult, JenkinsClient};
use crate::output::{Report, StepSummary, WorkflowCommands};
use crate::runner::{self, BuildFlow};
use crate::stages;

#[derive(Parser)]
#[command(name = "jenkins-pr")]
#[command(author, version, about = "Run a Jenkins job for a pull request", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger the job for the current pull request and wait for the result
    Run {
        #[command(flatten)]
        jenkins: JenkinsArgs,

        /// Source-control ref; only refs/pull/<number>/merge triggers a build
        #[arg(long = "ref", env = "GITHUB_REF")]
        git_ref: Option<String>,

        #[arg(long, env = "GITHUB_STEP_SUMMARY")]
        summary_file: Option<PathBuf>,

        /// Hide the phase spinners
        #[arg(long, default_value_t = false)]
        no_progress: bool,
    },
    /// Fold a saved timestamped build log without contacting Jenkins
    Parse {
        log_file: PathBuf,

        /// Build result to report
        #[arg(short, long, default_value = "SUCCESS")]
        result: String,

        #[arg(long, env = "GITHUB_STEP_SUMMARY")]
        summary_file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct JenkinsArgs {
    #[arg(short, long, env = "JENKINS_SERVER")]
    server: Option<String>,

    #[arg(short, long, env = "JENKINS_JOB")]
    job: Option<String>,

    #[arg(short, long, env = "JENKINS_USERNAME")]
    username: Option<String>,

    #[arg(short, long, env = "JENKINS_PAT", hide_env_values = true)]
    token: Option<String>,
}

impl From<&JenkinsArgs> for JenkinsConfig {
    fn from(args: &JenkinsArgs) -> Self {
        Self {
            server: args.server.clone(),
            job: args.job.clone(),
            username: args.username.clone(),
            token: args.token.clone(),
        }
    }
}

impl Cli {
    async fn execute_run(
        &self,
        jenkins: &JenkinsArgs,
        git_ref: Option<&str>,
        summary_file: Option<PathBuf>,
        show_progress: bool,
    ) -> Result<ExitCode> {
        let mut workflow = WorkflowCommands::stdout();
        let Some(request) = runner::read_trigger(git_ref, &mut workflow)? else {
            return Ok(ExitCode::SUCCESS);
        };

        let config = Config::load(self.config.as_deref())?;
        let target = config.jenkins.merge(jenkins.into()).into_target()?;
        info!("Using Jenkins job {} on {}", target.job, target.server);

        let client = JenkinsClient::new(&target.server, &target.job, target.credentials)?;
        let flow = BuildFlow {
            api: &client,
            job: client.job(),
            queue_policy: config.polling.queue_policy(),
            build_policy: config.polling.build_policy(),
            show_progress,
        };

        let report = flow
            .run(&request, &mut workflow, &StepSummary::new(summary_file))
            .await?;

        Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    fn execute_parse(
        log_file: &Path,
        result: &str,
        summary_file: Option<PathBuf>,
    ) -> Result<ExitCode> {
        let log = std::fs::read_to_string(log_file)
            .with_context(|| format!("Failed to read build log: {}", log_file.display()))?;

        let mut workflow = WorkflowCommands::stdout();
        let summary = stages::parse(&log, &mut workflow)?;
        info!("Parsed {} stages from {}", summary.stage_count, log_file.display());

        let report = Report::new(&BuildResult::from(result), &summary);
        report.publish(&mut workflow, &StepSummary::new(summary_file))?;
        workflow.flush()?;

        Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    pub async fn execute(&self) -> Result<ExitCode> {
        match &self.command {
            Commands::Run {
                jenkins,
                git_ref,
                summary_file,
                no_progress,
            } => {
                self.execute_run(
                    jenkins,
                    git_ref.as_deref(),
                    summary_file.clone(),
                    !no_progress,
                )
                .await
            }
            Commands::Parse {
                log_file,
                result,
                summary_file,
            } => Self::execute_parse(log_file, result, summary_file.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommand_defaults_to_success() {
        let cli = Cli::try_parse_from(["jenkins-pr", "parse", "build.log"]).unwrap();
        match cli.command {
            Commands::Parse {
                log_file, result, ..
            } => {
                assert_eq!(log_file, PathBuf::from("build.log"));
                assert_eq!(result, "SUCCESS");
            }
            Commands::Run { .. } => panic!("expected parse"),
        }
    }

    #[test]
    fn test_run_flags_become_config_overrides() {
        let cli = Cli::try_parse_from([
            "jenkins-pr",
            "run",
            "--server",
            "https://ci.example.com",
            "--job",
            "pr-check",
            "--ref",
            "refs/pull/42/merge",
        ])
        .unwrap();

        let Commands::Run { jenkins, git_ref, .. } = cli.command else {
            panic!("expected run");
        };
        let overrides = JenkinsConfig::from(&jenkins);
        assert_eq!(overrides.server.as_deref(), Some("https://ci.example.com"));
        assert_eq!(overrides.job.as_deref(), Some("pr-check"));
        assert_eq!(git_ref.as_deref(), Some("refs/pull/42/merge"));
    }

    #[tokio::test]
    async fn test_non_pull_request_ref_exits_cleanly_without_config() {
        let cli = Cli::try_parse_from([
            "jenkins-pr",
            "run",
            "--config",
            "does-not-exist.toml",
            "--ref",
            "refs/heads/main",
        ])
        .unwrap();

        let code = cli.execute().await.unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn test_parse_reports_failure_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("build.log");
        std::fs::write(&log, "t  [Pipeline] sh\nt  + make check\n").unwrap();

        let code = Cli::execute_parse(&log, "FAILURE", None).unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
    }
}
