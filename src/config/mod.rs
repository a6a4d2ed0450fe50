//! Configuration file handling for nodesync
//!
//! This module contains data structures for:
//! - `nodesync.yaml` - Project layout and behavior switches
//! - `frontend.yaml` - Declared frontend dependencies

pub mod dependencies;
pub mod project;

pub use dependencies::load_snapshot;
pub use project::{Project, ProjectConfig, project_root};
