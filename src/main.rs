//! stowage - deployment closure resolver
//!
//! Resolves an application descriptor against repository indexes into a
//! deployment manifest: every bundle pinned to an exact version, partitioned
//! into isolated application content and shared provisioned bundles, with
//! dependencies crossing the isolation boundary rejected as circular.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod manifest;
mod model;
mod resolver;
mod version;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "stowage=debug" } else { "stowage=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
