//! External tool errors

use super::NodeSyncError;

/// Where to point users that lack a Node.js installation
pub const NODE_INSTALL_HINT: &str =
    "Please install it using the https://nodejs.org/en/download/ guide.";

/// Creates a tool resolution error
pub fn not_found(tool: impl Into<String>, hint: impl Into<String>) -> NodeSyncError {
    NodeSyncError::ToolNotFound {
        tool: tool.into(),
        hint: hint.into(),
    }
}

/// Creates an error for a process that could not be started or awaited
pub fn spawn_failed(tool: impl Into<String>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::ToolSpawnFailed {
        tool: tool.into(),
        reason: reason.to_string(),
    }
}

/// Creates an error for a process that exited unsuccessfully
pub fn failed(tool: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> NodeSyncError {
    NodeSyncError::ToolFailed {
        tool: tool.into(),
        code: code.map_or_else(|| "<signal>".to_string(), |c| c.to_string()),
        stderr: stderr.into(),
    }
}
