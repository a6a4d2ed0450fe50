//! Entry file and module resolution errors

use std::fmt::Write;
use std::path::Path;

use super::NodeSyncError;
use crate::sync::imports::UnresolvedImport;

/// Creates an entry file I/O error
pub fn io(path: impl AsRef<Path>, reason: impl ToString) -> NodeSyncError {
    NodeSyncError::EntryFileIo {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates the aggregated unresolved imports error
pub fn unresolved(node_modules: impl AsRef<Path>, imports: Vec<UnresolvedImport>) -> NodeSyncError {
    NodeSyncError::UnresolvedImports {
        node_modules: node_modules.as_ref().display().to_string(),
        imports,
    }
}

/// One line per unresolved import, each terminated by a newline
pub(crate) fn describe_unresolved(imports: &[UnresolvedImport]) -> String {
    let mut out = String::new();
    for import in imports {
        let _ = writeln!(out, "{import}");
    }
    out
}
