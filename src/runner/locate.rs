//! Locating node, npm and webpack
//!
//! A project-local Node.js installation under `<npm folder>/node/` wins over
//! whatever is on `PATH`. Webpack is only ever taken from the project's
//! `node_modules`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, tool};
use crate::store::FileStore;

#[cfg(windows)]
const NODE_BINARY: &str = "node.exe";
#[cfg(not(windows))]
const NODE_BINARY: &str = "node";

/// npm entry point inside a project-local Node.js installation
const LOCAL_NPM_CLI: &str = "node/node_modules/npm/bin/npm-cli.js";

/// Webpack launcher installed by npm
const WEBPACK_BIN: &str = ".bin/webpack";

/// A program plus the leading arguments it always needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends `extra` after the leading arguments
    pub fn with_args<I, S>(&self, extra: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .iter()
            .cloned()
            .chain(extra.into_iter().map(Into::into))
            .collect()
    }
}

/// Looks a tool up on the system, e.g. through `PATH`
pub type SystemLookup = fn(&str) -> Option<PathBuf>;

fn which_lookup(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Resolves tool locations for one project
#[derive(Debug, Clone)]
pub struct ToolLocator {
    npm_folder: PathBuf,
    node_modules: PathBuf,
    system_lookup: SystemLookup,
}

impl ToolLocator {
    pub fn new(npm_folder: impl Into<PathBuf>, node_modules: impl Into<PathBuf>) -> Self {
        Self {
            npm_folder: npm_folder.into(),
            node_modules: node_modules.into(),
            system_lookup: which_lookup,
        }
    }

    /// Replaces the system-wide fallback lookup
    #[cfg(test)]
    #[must_use]
    pub fn with_system_lookup(mut self, lookup: SystemLookup) -> Self {
        self.system_lookup = lookup;
        self
    }

    fn local_node(&self) -> PathBuf {
        self.npm_folder.join("node").join(NODE_BINARY)
    }

    /// The npm command, possibly `node npm-cli.js` from a local installation
    ///
    /// # Errors
    ///
    /// Returns [`ToolNotFound`](crate::error::NodeSyncError::ToolNotFound) when
    /// neither a local installation nor a system `npm` exists.
    pub fn package_manager(&self, store: &impl FileStore) -> Result<ToolCommand> {
        let node = self.local_node();
        let npm_cli = self.npm_folder.join(LOCAL_NPM_CLI);
        if store.is_file(&node) && store.is_file(&npm_cli) {
            debug!(node = %node.display(), "Using project-local npm");
            return Ok(ToolCommand {
                program: node,
                args: vec![npm_cli.display().to_string()],
            });
        }

        (self.system_lookup)("npm")
            .map(ToolCommand::new)
            .ok_or_else(|| tool::not_found("npm", tool::NODE_INSTALL_HINT))
    }

    /// The node executable used to launch webpack
    ///
    /// # Errors
    ///
    /// Returns [`ToolNotFound`](crate::error::NodeSyncError::ToolNotFound) when
    /// no node executable can be found.
    pub fn js_runtime(&self, store: &impl FileStore) -> Result<PathBuf> {
        let node = self.local_node();
        if store.is_file(&node) {
            return Ok(node);
        }
        (self.system_lookup)("node").ok_or_else(|| tool::not_found("node", tool::NODE_INSTALL_HINT))
    }

    /// The webpack script installed in `node_modules`
    ///
    /// # Errors
    ///
    /// Returns [`ToolNotFound`](crate::error::NodeSyncError::ToolNotFound) when
    /// webpack has not been installed into the project.
    pub fn bundler_script(&self, store: &impl FileStore) -> Result<PathBuf> {
        let webpack = self.node_modules.join(WEBPACK_BIN);
        if store.is_file(&webpack) {
            Ok(webpack)
        } else {
            Err(tool::not_found(
                "webpack",
                format!(
                    "Unable to locate webpack executable by path '{}'. Run 'nodesync packages' to install it.",
                    webpack.display()
                ),
            ))
        }
    }

    pub fn npm_folder(&self) -> &Path {
        &self.npm_folder
    }
}
