//! Project configuration (nodesync.yaml)
//!
//! Every field is optional; a project without the file gets the defaults of
//! a conventional Maven-style layout with `package.json` at the root.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::BuildLayout;
use crate::error::{Result, config};
use crate::store::FileStore;
use crate::sync::TemplateSource;
use crate::sync::engine::FrontendPaths;

/// Configuration file name, looked up in the project root
pub const CONFIG_FILE: &str = "nodesync.yaml";

/// Contents of nodesync.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// `jar`/`library` or `war`/`archive`
    pub packaging: String,

    /// Compiled classes directory
    pub output_directory: PathBuf,

    pub build_directory: PathBuf,

    /// Artifact name; defaults to the project directory name
    pub final_name: Option<String>,

    /// Folder holding package.json
    pub npm_folder: PathBuf,

    /// Defaults to `<npm_folder>/node_modules`
    pub node_modules: Option<PathBuf>,

    pub entry_file: PathBuf,

    pub bundler_config: PathBuf,

    /// Custom webpack config template. An empty value turns config generation off.
    pub bundler_template: Option<PathBuf>,

    /// Translate legacy HTML imports into npm packages and JS modules
    pub convert_html: bool,

    /// Run webpack at the end of `nodesync frontend`
    pub generate_bundle: bool,

    /// Declared dependency file
    pub dependencies: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            packaging: "jar".to_string(),
            output_directory: PathBuf::from("target/classes"),
            build_directory: PathBuf::from("target"),
            final_name: None,
            npm_folder: PathBuf::from("."),
            node_modules: None,
            entry_file: PathBuf::from("frontend/main.js"),
            bundler_config: PathBuf::from("webpack.config.js"),
            bundler_template: None,
            convert_html: true,
            generate_bundle: true,
            dependencies: PathBuf::from("frontend.yaml"),
        }
    }
}

/// A configuration resolved against a project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub root: PathBuf,
    pub paths: FrontendPaths,
    pub layout: BuildLayout,
    pub packaging: String,
    pub template: TemplateSource,
    pub dependencies: PathBuf,
    pub convert_html: bool,
    pub generate_bundle: bool,
}

impl ProjectConfig {
    /// Parse configuration from a YAML string
    ///
    /// # Errors
    ///
    /// Returns [`ConfigParseFailed`](crate::error::NodeSyncError::ConfigParseFailed)
    /// for malformed YAML or unknown fields.
    pub fn from_yaml(path: &Path, yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| config::parse_failed(path, e))
    }

    /// Loads `nodesync.yaml` from `project_root`, or the defaults when it is absent
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(store: &impl FileStore, project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        match store.read(&path).map_err(|e| config::read_failed(&path, e))? {
            Some(yaml) => Self::from_yaml(&path, &yaml),
            None => Ok(Self::default()),
        }
    }

    /// Resolves every path against `root`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigInvalid`](crate::error::NodeSyncError::ConfigInvalid) when
    /// a file setting is empty or the artifact name cannot be derived.
    pub fn resolve(&self, root: &Path) -> Result<Project> {
        for (field, value) in [
            ("entry_file", &self.entry_file),
            ("bundler_config", &self.bundler_config),
            ("dependencies", &self.dependencies),
        ] {
            if value.file_name().is_none() {
                return Err(config::invalid(format!(
                    "'{field}' must name a file, got '{}'",
                    value.display()
                )));
            }
        }

        let final_name = match &self.final_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    config::invalid("'final_name' is required when the project root has no name")
                })?,
        };

        let npm_folder = join_clean(root, &self.npm_folder);
        let node_modules = self
            .node_modules
            .as_ref()
            .map_or_else(|| npm_folder.join("node_modules"), |dir| join_clean(root, dir));

        let template = match &self.bundler_template {
            None => TemplateSource::Embedded,
            Some(path) if path.as_os_str().is_empty() => TemplateSource::Disabled,
            Some(path) => TemplateSource::File(join_clean(root, path)),
        };

        Ok(Project {
            root: root.to_path_buf(),
            paths: FrontendPaths {
                entry_file: join_clean(root, &self.entry_file),
                bundler_config: join_clean(root, &self.bundler_config),
                npm_folder,
                node_modules,
            },
            layout: BuildLayout {
                project_root: root.to_path_buf(),
                output_directory: join_clean(root, &self.output_directory),
                build_directory: join_clean(root, &self.build_directory),
                final_name,
            },
            packaging: self.packaging.clone(),
            template,
            dependencies: join_clean(root, &self.dependencies),
            convert_html: self.convert_html,
            generate_bundle: self.generate_bundle,
        })
    }
}

/// Joins `relative` onto `root`, dropping `.` components
fn join_clean(root: &Path, relative: &Path) -> PathBuf {
    relative
        .components()
        .filter(|c| *c != Component::CurDir)
        .fold(root.to_path_buf(), |acc, c| acc.join(c))
}

/// Canonical project root: `project` if given, otherwise the current directory
///
/// # Errors
///
/// Returns [`ConfigReadFailed`](crate::error::NodeSyncError::ConfigReadFailed)
/// when the directory does not exist.
pub fn project_root(project: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match project {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|e| config::read_failed(".", e))?,
    };
    dunce::canonicalize(&dir).map_err(|e| config::read_failed(&dir, e))
}
