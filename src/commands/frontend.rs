//! Frontend command implementation
//!
//! Runs every synchronizer, then webpack unless bundling is turned off by
//! `--no-bundle` or `generate_bundle: false`.

use std::path::PathBuf;

use tracing::debug;

use super::helpers;
use crate::cli::FrontendArgs;
use crate::error::Result;
use crate::store::DiskStore;
use crate::ui;

/// Run frontend command
pub fn run(project: Option<PathBuf>, args: FrontendArgs) -> Result<()> {
    let project = helpers::load_project(project)?;
    let snapshot = helpers::load_snapshot(&project)?;
    let store = DiskStore;
    let mut engine = helpers::engine(&store, &project, &args.sync);

    let report = engine.execute(&snapshot)?;
    ui::print_report(&report, &project.root);

    if args.no_bundle || !project.generate_bundle {
        debug!("Bundling disabled, not running webpack");
        return Ok(());
    }

    let bundled = engine.bundle()?;
    ui::print_bundle(&bundled);
    Ok(())
}
