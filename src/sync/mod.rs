//! Synchronizers for the persisted frontend build artifacts
//!
//! Each synchronizer reconciles one file (package.json, the entry file, the
//! webpack config) with a [`DependencySnapshot`](crate::domain::DependencySnapshot)
//! and writes only when the content actually changes. Running any of them
//! twice in a row performs no writes and launches no processes the second time.

pub mod bundler;
pub mod engine;
pub mod html;
pub mod imports;
pub mod packages;

use std::path::{Path, PathBuf};

pub use bundler::{BundlerConfigSynchronizer, TemplateSource};
pub use engine::{FrontendReport, FrontendSync};
pub use imports::{ModuleImportResolver, UnresolvedImport};
pub use packages::PackageManifestSynchronizer;

/// How a synchronizer run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing needed to change
    UpToDate,
    /// At least one file was written or tool run
    Updated,
    /// The run finished, but a recoverable step failed and a later run should retry
    Degraded { reason: String },
}

/// Result of one synchronizer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub status: SyncStatus,
    /// Files written, in write order
    pub written: Vec<PathBuf>,
    /// External processes launched
    pub invocations: usize,
}

impl Default for SyncResult {
    fn default() -> Self {
        Self::up_to_date()
    }
}

impl SyncResult {
    pub fn up_to_date() -> Self {
        Self {
            status: SyncStatus::UpToDate,
            written: Vec::new(),
            invocations: 0,
        }
    }

    pub(crate) fn record_write(&mut self, path: &Path) {
        self.written.push(path.to_path_buf());
        self.mark_updated();
    }

    pub(crate) fn record_invocation(&mut self) {
        self.invocations += 1;
        self.mark_updated();
    }

    /// Degraded wins over updated; the first reason is kept
    pub(crate) fn degrade(&mut self, reason: impl Into<String>) {
        if !self.is_degraded() {
            self.status = SyncStatus::Degraded {
                reason: reason.into(),
            };
        }
    }

    fn mark_updated(&mut self) {
        if self.status == SyncStatus::UpToDate {
            self.status = SyncStatus::Updated;
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.status == SyncStatus::UpToDate
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, SyncStatus::Degraded { .. })
    }
}
