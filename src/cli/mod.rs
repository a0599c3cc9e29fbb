//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - resolve: Resolve command arguments
//! - check: Check command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod check;
pub mod completions;
pub mod resolve;

pub use check::CheckArgs;
pub use completions::CompletionsArgs;
pub use resolve::ResolveArgs;

/// stowage - deployment closure resolver
///
/// Compute the frozen bundle list for an application archive: isolated
/// content, shared provisioned bundles, and a validated isolation boundary.
#[derive(Parser, Debug)]
#[command(
    name = "stowage",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Deployment closure resolver for partitioned application archives",
    long_about = "Stowage resolves an application descriptor against repository indexes and \
                  writes a deployment manifest pinning every bundle to an exact version, \
                  partitioned into isolated application content and shared provisioned bundles. \
                  Shared bundles depending on isolated content are rejected as circular.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  stowage resolve app.yaml -r repo.yaml            \x1b[90m# Write deployment.mf\x1b[0m\n   \
                  stowage resolve app.yaml -r repo.yaml -o out.mf  \x1b[90m# Custom output path\x1b[0m\n   \
                  stowage check app.yaml -r repo.yaml              \x1b[90m# Validate without writing\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an application and write its deployment manifest
    Resolve(ResolveArgs),

    /// Resolve an application and report the partition without writing
    Check(CheckArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
