mod auth;
mod cli;
mod config;
mod error;
mod event;
mod jenkins;
mod output;
mod runner;
mod stages;

use clap::Parser;
use cli::Cli;
use log::info;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting jenkins-pr");

    match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            // Every failure ends up on the workflow's error channel.
            let mut workflow = output::WorkflowCommands::stdout();
            if workflow.error(&format!("{e:#}")).is_err() {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
