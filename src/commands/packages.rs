//! Packages command implementation

use std::path::PathBuf;

use super::helpers;
use crate::cli::SyncArgs;
use crate::error::Result;
use crate::store::DiskStore;
use crate::ui;

/// Run packages command
pub fn run(project: Option<PathBuf>, args: SyncArgs) -> Result<()> {
    let project = helpers::load_project(project)?;
    let snapshot = helpers::load_snapshot(&project)?;
    let store = DiskStore;

    let result = helpers::engine(&store, &project, &args).sync_packages(&snapshot)?;

    ui::print_sync_result("Packages", &result, &project.root);
    Ok(())
}
