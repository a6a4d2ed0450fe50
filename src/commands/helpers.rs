//! Command helper utilities

use std::path::PathBuf;

use tracing::info;

use crate::cli::SyncArgs;
use crate::config::{self, Project, ProjectConfig};
use crate::domain::DependencySnapshot;
use crate::error::Result;
use crate::runner::ProcessRunner;
use crate::store::DiskStore;
use crate::sync::FrontendSync;

/// Resolve the project from the optional `--project` argument
///
/// Uses the current directory when no project path is given, then applies
/// `nodesync.yaml` if the project has one.
pub fn load_project(project: Option<PathBuf>) -> Result<Project> {
    let root = config::project_root(project)?;
    ProjectConfig::load(&DiskStore, &root)?.resolve(&root)
}

/// Load the project's declared dependencies
pub fn load_snapshot(project: &Project) -> Result<DependencySnapshot> {
    let snapshot = config::load_snapshot(&DiskStore, &project.dependencies)?;
    if snapshot.is_empty() {
        info!(
            "No frontend dependencies declared in {}",
            project.dependencies.display()
        );
    }
    Ok(snapshot)
}

/// Build the synchronization engine for `project`, with command flags applied
pub fn engine<'a>(
    store: &'a DiskStore,
    project: &Project,
    args: &SyncArgs,
) -> FrontendSync<'a, DiskStore, ProcessRunner> {
    FrontendSync::new(
        store,
        ProcessRunner,
        project.paths.clone(),
        project.layout.clone(),
    )
    .packaging(project.packaging.clone())
    .template(project.template.clone())
    .convert_html(project.convert_html && !args.no_convert_html)
}
