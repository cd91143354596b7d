//! Crosstalk - Main entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crosstalk::{
    cli::{
        Cli, Command, RunOptions, run_check_thread_command, run_coordinator, run_route_command,
        run_status_command, run_summarize_command,
    },
    config::Config,
};

/// Initialize tracing for simple CLI commands (warn level).
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize tracing for the long-running coordinator (info level).
fn init_run_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crosstalk=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command();

    // stdout carries command output; logs go to stderr.
    match &command {
        Command::Run { .. } => init_run_tracing(),
        _ => init_cli_tracing(),
    }

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;

    match command {
        Command::Run { post, responders } => {
            run_coordinator(config, RunOptions { post, responders }).await
        }
        Command::Route { event } => run_route_command(&config, event),
        Command::Summarize { thread_ts } => run_summarize_command(&config, &thread_ts).await,
        Command::CheckThread { thread_ts } => {
            run_check_thread_command(&config, &thread_ts).await
        }
        Command::Status => run_status_command(&config),
    }
}
