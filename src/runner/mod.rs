//! External tool invocation
//!
//! [`CommandRunner`] is the narrow seam over process spawning;
//! [`ExternalToolRunner`] layers the exit-code policy on top of it:
//!
//! - a failing **bundler** run is fatal, since no usable artifact exists;
//! - a failing **package manager** run is reported but not raised, since a
//!   later run can install whatever is still missing.

pub mod locate;
pub mod process;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::error::{Result, tool};

pub use locate::ToolLocator;
pub use process::ProcessRunner;

/// Which tool is being run, deciding how failures propagate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    PackageManager,
    Bundler,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackageManager => f.write_str("npm"),
            Self::Bundler => f.write_str("Webpack"),
        }
    }
}

/// A fully resolved process launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl Invocation {
    /// The command line as a single string, for logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a finished process left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Everything the process wrote to standard error
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches a process and waits for it
pub trait CommandRunner {
    /// Runs `invocation` to completion
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the process cannot be started or awaited.
    fn execute(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

/// Outcome of a tool run that did not raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Succeeded,
    /// Only produced in [`RunMode::PackageManager`]
    Failed { code: Option<i32>, stderr: String },
}

/// Runs external tools and applies the per-mode exit-code policy
#[derive(Debug)]
pub struct ExternalToolRunner<R: CommandRunner> {
    runner: R,
    invocations: usize,
}

impl<R: CommandRunner> ExternalToolRunner<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            invocations: 0,
        }
    }

    /// Number of processes launched so far
    #[cfg(test)]
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    #[cfg(test)]
    pub fn inner(&self) -> &R {
        &self.runner
    }

    /// Runs `command` with `args` inside `working_dir`
    ///
    /// # Errors
    ///
    /// - [`ToolSpawnFailed`](crate::error::NodeSyncError::ToolSpawnFailed) when the process cannot start
    /// - [`ToolFailed`](crate::error::NodeSyncError::ToolFailed) when the bundler exits unsuccessfully
    pub fn run(
        &mut self,
        command: &Path,
        args: &[String],
        working_dir: &Path,
        mode: RunMode,
    ) -> Result<RunResult> {
        let invocation = Invocation {
            program: command.to_path_buf(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        };
        debug!(command = %invocation.command_line(), cwd = %working_dir.display(), "Running {mode}");

        self.invocations += 1;
        let output = self
            .runner
            .execute(&invocation)
            .map_err(|e| tool::spawn_failed(mode.to_string(), e))?;

        if output.success() {
            return Ok(RunResult::Succeeded);
        }

        match mode {
            RunMode::Bundler => Err(tool::failed(mode.to_string(), output.code, output.stderr)),
            RunMode::PackageManager => {
                error!(
                    code = ?output.code,
                    ">>> Dependency ERROR. Check that all required dependencies are deployed in npm repositories."
                );
                Ok(RunResult::Failed {
                    code: output.code,
                    stderr: output.stderr,
                })
            }
        }
    }
}
