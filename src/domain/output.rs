//! Bundler output location
//!
//! Where webpack writes its build depends on how the surrounding project is
//! packaged: libraries serve static resources from `META-INF/resources`
//! inside the compiled classes, archives serve them from the exploded
//! archive directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{NodeSyncError, Result, config::unsupported_packaging};

/// Resource directory served from library (jar) packaging
pub const LIBRARY_RESOURCES_DIR: &str = "META-INF/resources";

/// Build-output shape of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagingMode {
    Library,
    Archive,
}

impl FromStr for PackagingMode {
    type Err = NodeSyncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "jar" | "library" => Ok(Self::Library),
            "war" | "archive" => Ok(Self::Archive),
            other => Err(unsupported_packaging(other)),
        }
    }
}

impl fmt::Display for PackagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => f.write_str("library"),
            Self::Archive => f.write_str("archive"),
        }
    }
}

/// Build-output path facts supplied by the surrounding build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    /// Project base directory
    pub project_root: PathBuf,
    /// Compiled classes directory (e.g. `target/classes`)
    pub output_directory: PathBuf,
    /// Build directory (e.g. `target`)
    pub build_directory: PathBuf,
    /// Final artifact name without extension
    pub final_name: String,
}

/// Where the bundler is told to emit its build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerOutputTarget {
    pub output_directory: PathBuf,
    pub packaging_mode: PackagingMode,
}

impl BundlerOutputTarget {
    /// Resolves the output directory for a packaging string
    ///
    /// # Errors
    ///
    /// Returns [`NodeSyncError::UnsupportedPackaging`] naming `packaging` when it
    /// is neither a library nor an archive mode.
    pub fn resolve(packaging: &str, layout: &BuildLayout) -> Result<Self> {
        let packaging_mode: PackagingMode = packaging.parse()?;
        let output_directory = match packaging_mode {
            PackagingMode::Library => layout.output_directory.join(LIBRARY_RESOURCES_DIR),
            PackagingMode::Archive => layout.build_directory.join(&layout.final_name),
        };
        Ok(Self {
            output_directory,
            packaging_mode,
        })
    }

    /// Output directory relative to `project_root`, with forward slashes
    ///
    /// Directories outside the project are returned as given.
    pub fn relative_to(&self, project_root: &Path) -> String {
        project_relative(&self.output_directory, project_root)
    }
}

/// `path` relative to `project_root`, with forward slashes
///
/// Paths outside the project are returned as given.
pub fn project_relative(path: &Path, project_root: &Path) -> String {
    let Ok(relative) = path.strip_prefix(project_root) else {
        return path.display().to_string().replace('\\', "/");
    };
    let rendered = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if rendered.is_empty() {
        ".".to_string()
    } else {
        rendered
    }
}
