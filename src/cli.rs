//! CLI argument parsing.
//!
//! The CLI stays thin: it locates the project and hands off to the workflow.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "asset-stage",
    version,
    about = "Stage frontend assets from installed Composer packages",
    after_help = "Examples:\n  asset-stage refresh-assets\n  asset-stage --working-dir ./app refresh-assets\n  RUST_LOG=debug asset-stage refresh-assets",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Project root containing composer.json
    #[arg(long, short = 'd', value_name = "DIR", default_value = ".", global = true)]
    pub working_dir: PathBuf,

    /// Emit debug diagnostics on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    RefreshAssets(RefreshAssetsArgs),
}

/// Refresh command; takes no arguments of its own.
#[derive(Parser, Debug)]
#[command(about = "Rebuild the assets directory from installed packages")]
pub struct RefreshAssetsArgs {}
