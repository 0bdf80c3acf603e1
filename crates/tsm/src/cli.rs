//! Clap CLI definitions for the `tsm` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// tsm -- generate cross-linked tracker issues from markdown templates.
///
/// One tracking issue aggregates a set of implementation issues; placeholder
/// references are resolved to concrete issue numbers after creation.
#[derive(Parser, Debug)]
#[command(
    name = "tsm",
    about = "Template-driven tracker issue generator",
    long_about = "Generates one tracking issue plus a set of implementation issues from a \
                  directory of markdown templates, resolving {{IMPL_n}} placeholders to the \
                  issue numbers assigned by the tracker.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file path (default: walk up looking for tracksmith.yaml).
    #[arg(long, global = true, env = "TRACKSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a tracking issue and implementation issues from templates.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Delete the issues recorded by the last generation run.
    Cleanup(CleanupArgs),

    /// Print version and platform info.
    Version,
}

/// Arguments for `tsm generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Template directory (00_*.md tracking, 01_*.md.. implementations).
    pub dir: PathBuf,

    /// Repository override as owner/name (takes priority over config).
    #[arg(long)]
    pub repo: Option<String>,

    /// Run the full two-pass protocol against an in-memory tracker and
    /// print the result instead of touching the real tracker.
    #[arg(long)]
    pub dry_run: bool,

    /// Pause between tracker calls, in milliseconds (overrides config).
    #[arg(long, value_name = "MS")]
    pub pause: Option<u64>,
}

/// Arguments for `tsm cleanup`.
#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Actually delete. Without this flag the command only lists the
    /// identifiers that would be deleted.
    #[arg(long)]
    pub yes: bool,
}
