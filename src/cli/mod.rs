//! CLI definitions using clap derive API
//!
//! - sync: arguments shared by the synchronization commands
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod sync;

pub use completions::CompletionsArgs;
pub use sync::{FrontendArgs, SyncArgs};

/// nodesync - frontend build synchronizer
///
/// Keeps package.json, the frontend entry file and the webpack config in line
/// with the frontend dependencies a project declares.
#[derive(Parser, Debug)]
#[command(
    name = "nodesync",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Synchronizes npm packages, JS imports and webpack config with declared frontend dependencies",
    long_about = "nodesync reads the frontend dependencies a project declares (frontend.yaml), \
                  installs missing npm packages, regenerates the webpack entry file and renders \
                  webpack.config.js. Files are only written when their content changes.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  nodesync packages                   \x1b[90m# Install missing npm packages\x1b[0m\n   \
                  nodesync imports                    \x1b[90m# Regenerate frontend/main.js\x1b[0m\n   \
                  nodesync frontend                   \x1b[90m# Everything, then run webpack\x1b[0m\n   \
                  nodesync frontend --no-bundle       \x1b[90m# Everything except webpack\x1b[0m\n   \
                  nodesync -p ./app frontend          \x1b[90m# Work on another project\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "NODESYNC_PROJECT")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add missing packages to package.json and install them with npm
    Packages(SyncArgs),

    /// Regenerate the frontend entry file from declared modules
    Imports(SyncArgs),

    /// Synchronize packages, imports and webpack config, then bundle
    Frontend(FrontendArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
