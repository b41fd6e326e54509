//! EMS Client - Main Entry Point
//!
//! Command-line front end for the equipment management system API.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use ems_client::{cli::Cli, commands, logging, EmsContext};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config().context("invalid configuration")?;

    logging::init(&config.log_dir());
    info!("EMS client starting...");

    let ctx = EmsContext::init(config).context("failed to initialise client")?;
    let result = commands::dispatch(&ctx, cli.command).await;
    ctx.shutdown();

    result
}
