//! Display functions for synchronization results

use std::path::Path;

use console::Style;

use crate::sync::{FrontendReport, SyncResult, SyncStatus};

/// Width of the step label column
const LABEL_WIDTH: usize = 14;

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Plain-text status word, used for the summary line
pub fn status_word(result: &SyncResult) -> &'static str {
    match result.status {
        SyncStatus::UpToDate => "up to date",
        SyncStatus::Updated => "updated",
        SyncStatus::Degraded { .. } => "degraded",
    }
}

/// Print one step's outcome and the files it wrote
pub fn print_sync_result(label: &str, result: &SyncResult, root: &Path) {
    let status = match result.status {
        SyncStatus::UpToDate => Style::new().dim(),
        SyncStatus::Updated => Style::new().green(),
        SyncStatus::Degraded { .. } => Style::new().yellow(),
    };
    println!(
        "  {} {}",
        Style::new().bold().apply_to(format!("{label:<LABEL_WIDTH$}")),
        status.apply_to(status_word(result))
    );

    let mut written: Vec<&Path> = result.written.iter().map(|p| relative(p, root)).collect();
    written.dedup();
    for path in written {
        println!("    {}", Style::new().dim().apply_to(path.display()));
    }

    if let SyncStatus::Degraded { reason } = &result.status {
        println!("    {}", Style::new().yellow().apply_to(reason));
        println!(
            "    {}",
            Style::new().dim().apply_to("The next run will retry the installation.")
        );
    }
}

/// Print every step of a full run
pub fn print_report(report: &FrontendReport, root: &Path) {
    print_sync_result("Packages", &report.packages, root);
    print_sync_result("Imports", &report.imports, root);
    print_sync_result("Webpack config", &report.bundler_config, root);
    if report.is_up_to_date() {
        println!("  {}", Style::new().dim().apply_to("Nothing to synchronize."));
    }
}

/// Print the outcome of the bundler run
pub fn print_bundle(result: &SyncResult) {
    let plural = if result.invocations == 1 { "" } else { "es" };
    println!(
        "  {} {} ({} process{plural})",
        Style::new().bold().apply_to(format!("{:<LABEL_WIDTH$}", "Bundle")),
        Style::new().green().apply_to("built"),
        result.invocations
    );
}
