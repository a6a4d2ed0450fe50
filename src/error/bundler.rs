//! Bundler configuration errors

use std::path::Path;

use super::NodeSyncError;

/// Creates a bundler config I/O error
pub fn io(path: impl AsRef<Path>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::BundlerConfigIo {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an error for a rendered template that still has placeholders
pub fn template_unrendered(path: impl AsRef<Path>, marker: &str) -> NodeSyncError {
    NodeSyncError::TemplateUnrendered {
        path: path.as_ref().display().to_string(),
        marker: marker.to_string(),
    }
}
