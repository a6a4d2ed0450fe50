//! Configuration errors

use std::path::Path;

use super::NodeSyncError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl AsRef<Path>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::ConfigParseFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl AsRef<Path>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::ConfigReadFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> NodeSyncError {
    NodeSyncError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates an unsupported packaging error
pub fn unsupported_packaging(packaging: impl Into<String>) -> NodeSyncError {
    NodeSyncError::UnsupportedPackaging {
        packaging: packaging.into(),
    }
}
