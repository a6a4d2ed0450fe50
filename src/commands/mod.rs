//! Command implementations for nodesync CLI

pub mod completions;
pub mod frontend;
pub mod helpers;
pub mod imports;
pub mod packages;
pub mod version;
