//! Package manifest errors

use std::path::Path;

use super::NodeSyncError;

/// Creates a manifest I/O error
pub fn io(path: impl AsRef<Path>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::ManifestIo {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a manifest parse error
pub fn parse_failed(path: impl AsRef<Path>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::ManifestParse {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}
