//! Declared frontend dependencies (frontend.yaml)
//!
//! Whatever scans the project's components writes this file; nodesync only
//! reads it. A project that declares nothing may omit it.

use std::path::Path;

use tracing::debug;

use crate::domain::DependencySnapshot;
use crate::error::{Result, config};
use crate::store::FileStore;

/// Reads the dependency snapshot at `path`
///
/// # Errors
///
/// Returns [`ConfigReadFailed`](crate::error::NodeSyncError::ConfigReadFailed)
/// or [`ConfigParseFailed`](crate::error::NodeSyncError::ConfigParseFailed)
/// when the file exists but cannot be read or parsed.
pub fn load_snapshot(store: &impl FileStore, path: &Path) -> Result<DependencySnapshot> {
    let Some(yaml) = store.read(path).map_err(|e| config::read_failed(path, e))? else {
        debug!("No dependency file at {}, nothing is declared", path.display());
        return Ok(DependencySnapshot::default());
    };
    if yaml.trim().is_empty() {
        return Ok(DependencySnapshot::default());
    }
    serde_yaml::from_str(&yaml).map_err(|e| config::parse_failed(path, e))
}
