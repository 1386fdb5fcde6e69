use anyhow::Result;
use clap::Parser;

mod cli;
mod composer;
mod config;
mod conflict;
mod error;
mod host;
mod mapping;
mod output;
mod paths;
mod staging;
mod transfer;
mod util;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::RefreshAssets(command_args) => {
            workflow::run_refresh_assets(&args.working_dir, command_args)
        }
    }
}

/// Diagnostics go to stderr so they never interleave with progress output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
