//! Webpack configuration rendering
//!
//! Templates name project paths through `{{…}}` tokens. Each token is
//! replaced with a project-relative path quoted for a single-quoted JS
//! string; any other `{{` in a template is rejected before rendering.

use std::path::{Path, PathBuf};

use tracing::info;

use super::SyncResult;
use crate::domain::{BundlerOutputTarget, project_relative};
use crate::error::{Result, bundler};
use crate::store::FileStore;

/// Replaced with the bundler output directory
pub const OUTPUT_PLACEHOLDER: &str = "{{OUTPUT_DIRECTORY}}";

/// Replaced with the entry file, `./`-prefixed as webpack expects
pub const ENTRY_PLACEHOLDER: &str = "{{ENTRY_FILE}}";

/// Replaced with the node_modules directory
pub const NODE_MODULES_PLACEHOLDER: &str = "{{NODE_MODULES}}";

const PLACEHOLDERS: [&str; 3] = [OUTPUT_PLACEHOLDER, ENTRY_PLACEHOLDER, NODE_MODULES_PLACEHOLDER];

/// Opens every token; none may appear in a template outside the known ones
pub const PLACEHOLDER_MARKER: &str = "{{";

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/webpack.config.js");

/// Where the config template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The template shipped with nodesync
    Embedded,
    /// A project-provided template
    File(PathBuf),
    /// Config generation is turned off
    Disabled,
}

/// Project-relative paths substituted into a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateValues {
    pub output_directory: String,
    pub entry_file: String,
    pub node_modules: String,
}

impl TemplateValues {
    pub fn new(project_root: &Path, output: &BundlerOutputTarget, entry_file: &Path, node_modules: &Path) -> Self {
        let entry = project_relative(entry_file, project_root);
        let entry_file = if Path::new(&entry).is_absolute() {
            entry
        } else {
            format!("./{entry}")
        };
        Self {
            output_directory: output.relative_to(project_root),
            entry_file,
            node_modules: project_relative(node_modules, project_root),
        }
    }
}

/// Returns true when `template` opens a token other than the known ones
pub fn has_unknown_placeholder(template: &str) -> bool {
    PLACEHOLDERS
        .iter()
        .fold(template.to_string(), |rest, token| rest.replace(token, ""))
        .contains(PLACEHOLDER_MARKER)
}

fn js_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Substitutes every known token in `template`
pub fn render_template(template: &str, values: &TemplateValues) -> String {
    template
        .replace(OUTPUT_PLACEHOLDER, &js_quoted(&values.output_directory))
        .replace(ENTRY_PLACEHOLDER, &js_quoted(&values.entry_file))
        .replace(NODE_MODULES_PLACEHOLDER, &js_quoted(&values.node_modules))
}

/// Keeps `webpack.config.js` in line with the project's layout
pub struct BundlerConfigSynchronizer<'a, S: FileStore> {
    store: &'a S,
    project_root: &'a Path,
    entry_file: &'a Path,
    node_modules: &'a Path,
}

impl<'a, S: FileStore> BundlerConfigSynchronizer<'a, S> {
    pub fn new(store: &'a S, project_root: &'a Path, entry_file: &'a Path, node_modules: &'a Path) -> Self {
        Self {
            store,
            project_root,
            entry_file,
            node_modules,
        }
    }

    /// Renders `source` into `target_config`, writing only on change
    ///
    /// # Errors
    ///
    /// - [`BundlerConfigIo`](crate::error::NodeSyncError::BundlerConfigIo) when the template or config cannot be read or written
    /// - [`TemplateUnrendered`](crate::error::NodeSyncError::TemplateUnrendered) when the template holds an unknown placeholder
    pub fn synchronize(
        &self,
        source: &TemplateSource,
        target_config: &Path,
        output: &BundlerOutputTarget,
    ) -> Result<SyncResult> {
        let template = match source {
            TemplateSource::Disabled => {
                info!("Webpack config generation is disabled");
                return Ok(SyncResult::up_to_date());
            }
            TemplateSource::Embedded => DEFAULT_TEMPLATE.to_string(),
            TemplateSource::File(path) => self
                .store
                .read(path)
                .map_err(|e| bundler::io(path, e))?
                .ok_or_else(|| bundler::io(path, "template file does not exist"))?,
        };

        // Checked before substitution, since project paths may contain `{{`
        if has_unknown_placeholder(&template) {
            return Err(bundler::template_unrendered(target_config, PLACEHOLDER_MARKER));
        }
        let values = TemplateValues::new(self.project_root, output, self.entry_file, self.node_modules);
        let rendered = render_template(&template, &values);

        let existing = self
            .store
            .read(target_config)
            .map_err(|e| bundler::io(target_config, e))?;
        if existing.as_deref() == Some(rendered.as_str()) {
            info!("No webpack config to update");
            return Ok(SyncResult::up_to_date());
        }

        self.store
            .write(target_config, &rendered)
            .map_err(|e| bundler::io(target_config, e))?;
        info!("Updated {}", target_config.display());

        let mut result = SyncResult::up_to_date();
        result.record_write(target_config);
        Ok(result)
    }
}
