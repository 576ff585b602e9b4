//! `report-scoring` command-line client

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "report_scoring=debug,report_scoring_sdk=debug,report_scoring_core=debug"
    } else {
        "report_scoring=warn,report_scoring_sdk=warn,report_scoring_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&ctx, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(ctx: &Context, command: Commands) -> Result<()> {
    tracing::debug!(api_url = %ctx.api_url(), "Running command");
    match command {
        Commands::Files(cmd) => commands::files::execute(ctx, cmd).await,
        Commands::Reports(cmd) => commands::reports::execute(ctx, cmd).await,
        Commands::Scoring(cmd) => commands::scoring::execute(ctx, cmd).await,
        Commands::Auth(cmd) => commands::auth::execute(ctx, cmd).await,
        Commands::Routes(cmd) => commands::routes::execute(ctx, cmd).await,
        Commands::Config(cmd) => commands::config::execute(ctx, cmd).await,
    }
}
