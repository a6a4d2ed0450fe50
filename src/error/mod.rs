//! Error types and handling for nodesync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`manifest`]: package.json errors
//! - [`imports`]: Entry file and module resolution errors
//! - [`bundler`]: Bundler configuration errors
//! - [`tool`]: External tool lookup and execution errors
//! - [`config`]: Project configuration errors

pub mod bundler;
pub mod config;
pub mod imports;
pub mod manifest;
pub mod tool;

use miette::Diagnostic;
use thiserror::Error;

use crate::sync::UnresolvedImport;

/// Main error type for nodesync operations
#[derive(Error, Diagnostic, Debug)]
pub enum NodeSyncError {
    // Manifest errors
    #[error("Failed to access package manifest '{path}': {reason}")]
    #[diagnostic(code(nodesync::manifest::io))]
    ManifestIo { path: String, reason: String },

    #[error("Failed to parse package manifest '{path}': {reason}")]
    #[diagnostic(
        code(nodesync::manifest::parse_failed),
        help("package.json must be a JSON object whose dependency sections map names to strings")
    )]
    ManifestParse { path: String, reason: String },

    // Entry file errors
    #[error("Failed to update the imports file '{path}': {reason}")]
    #[diagnostic(code(nodesync::imports::io))]
    EntryFileIo { path: String, reason: String },

    #[error(
        "Failed to resolve the following module imports neither in the node_modules directory '{node_modules}' nor in project files:\n{}Double check that those files exist in the project structure.",
        crate::error::imports::describe_unresolved(.imports)
    )]
    #[diagnostic(
        code(nodesync::imports::unresolved),
        help("Run 'nodesync packages' to install missing npm packages")
    )]
    UnresolvedImports {
        node_modules: String,
        imports: Vec<UnresolvedImport>,
    },

    // Bundler configuration errors
    #[error("Unsupported packaging '{packaging}'")]
    #[diagnostic(
        code(nodesync::bundler::unsupported_packaging),
        help("Supported packaging modes: jar (library), war (archive)")
    )]
    UnsupportedPackaging { packaging: String },

    #[error("Failed to write bundler configuration '{path}': {reason}")]
    #[diagnostic(code(nodesync::bundler::io))]
    BundlerConfigIo { path: String, reason: String },

    #[error("Rendered bundler configuration '{path}' still contains the placeholder marker '{marker}'")]
    #[diagnostic(
        code(nodesync::bundler::template_unrendered),
        help("The template uses a placeholder this version of nodesync does not know")
    )]
    TemplateUnrendered { path: String, marker: String },

    // External tool errors
    #[error("Failed to determine '{tool}' tool. {hint}")]
    #[diagnostic(code(nodesync::tool::not_found))]
    ToolNotFound { tool: String, hint: String },

    #[error("Failed to run {tool}: {reason}")]
    #[diagnostic(code(nodesync::tool::spawn_failed))]
    ToolSpawnFailed { tool: String, reason: String },

    #[error("{tool} process exited with non-zero exit code {code}.\nStderr: '{stderr}'")]
    #[diagnostic(code(nodesync::tool::failed))]
    ToolFailed {
        tool: String,
        code: String,
        stderr: String,
    },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(nodesync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(nodesync::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(nodesync::config::invalid))]
    ConfigInvalid { message: String },
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, NodeSyncError>;
