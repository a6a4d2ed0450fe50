//! nodesync - frontend build synchronizer
//!
//! Keeps a project's package.json, generated webpack entry file and webpack
//! configuration in line with the frontend dependencies its components
//! declare, then drives npm and webpack.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod runner;
mod store;
mod sync;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Environment variable holding a `tracing` filter directive
const LOG_ENV: &str = "NODESYNC_LOG";

/// Log filter: `NODESYNC_LOG` if set, otherwise `info` (`debug` when verbose)
fn log_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Packages(args) => commands::packages::run(cli.project, args),
        Commands::Imports(args) => commands::imports::run(cli.project, args),
        Commands::Frontend(args) => commands::frontend::run(cli.project, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
