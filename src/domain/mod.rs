//! Domain models for nodesync
//!
//! This module contains pure domain objects describing declared frontend
//! dependencies and where the bundler writes its output. They hold no file
//! handles and perform no I/O.

pub mod output;
pub mod snapshot;

pub use output::{BuildLayout, BundlerOutputTarget, PackagingMode, project_relative};
pub use snapshot::{DependencySnapshot, HtmlImport, ThemeDescriptor};
