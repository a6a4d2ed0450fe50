//! Terminal summaries
//!
//! Synchronizers log their progress through `tracing`; this module prints the
//! one-line-per-step summary a command ends with.

pub mod display;

pub use display::{print_bundle, print_report, print_sync_result};
