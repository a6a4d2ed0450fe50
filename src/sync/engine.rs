//! One full frontend synchronization pass
//!
//! [`FrontendSync`] wires the three synchronizers to one project layout and
//! runs them in dependency order: package.json first (webpack itself is a
//! dev dependency), then the entry file, then the webpack config. The
//! bundler only runs on request.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{
    BundlerConfigSynchronizer, ModuleImportResolver, PackageManifestSynchronizer, SyncResult,
    TemplateSource,
};
use crate::domain::{BuildLayout, BundlerOutputTarget, DependencySnapshot};
use crate::error::Result;
use crate::runner::{CommandRunner, ExternalToolRunner, RunMode, ToolLocator};
use crate::store::FileStore;

const MANIFEST_FILE: &str = "package.json";

/// Files and directories the synchronizers work on, all absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendPaths {
    /// Folder holding package.json
    pub npm_folder: PathBuf,
    pub node_modules: PathBuf,
    pub entry_file: PathBuf,
    pub bundler_config: PathBuf,
}

impl FrontendPaths {
    pub fn manifest(&self) -> PathBuf {
        self.npm_folder.join(MANIFEST_FILE)
    }

    /// Root for `./` imports: the folder holding the entry file
    pub fn local_root(&self) -> &Path {
        self.entry_file.parent().unwrap_or(&self.npm_folder)
    }
}

/// Outcome of [`FrontendSync::execute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendReport {
    pub packages: SyncResult,
    pub imports: SyncResult,
    pub bundler_config: SyncResult,
}

impl FrontendReport {
    pub fn is_up_to_date(&self) -> bool {
        self.packages.is_up_to_date()
            && self.imports.is_up_to_date()
            && self.bundler_config.is_up_to_date()
    }
}

/// Runs the synchronizers for one project
pub struct FrontendSync<'a, S: FileStore, R: CommandRunner> {
    store: &'a S,
    tools: ExternalToolRunner<R>,
    locator: ToolLocator,
    paths: FrontendPaths,
    layout: BuildLayout,
    packaging: String,
    template: TemplateSource,
    convert_html: bool,
}

impl<'a, S: FileStore, R: CommandRunner> FrontendSync<'a, S, R> {
    pub fn new(store: &'a S, runner: R, paths: FrontendPaths, layout: BuildLayout) -> Self {
        let locator = ToolLocator::new(&paths.npm_folder, &paths.node_modules);
        Self {
            store,
            tools: ExternalToolRunner::new(runner),
            locator,
            paths,
            layout,
            packaging: "jar".to_string(),
            template: TemplateSource::Embedded,
            convert_html: true,
        }
    }

    #[must_use]
    pub fn packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    #[must_use]
    pub fn template(mut self, template: TemplateSource) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn convert_html(mut self, convert_html: bool) -> Self {
        self.convert_html = convert_html;
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_locator(mut self, locator: ToolLocator) -> Self {
        self.locator = locator;
        self
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        self.tools.inner()
    }

    /// Updates package.json and installs what is missing
    ///
    /// # Errors
    ///
    /// See [`PackageManifestSynchronizer::synchronize`].
    pub fn sync_packages(&mut self, snapshot: &DependencySnapshot) -> Result<SyncResult> {
        let manifest = self.paths.manifest();
        PackageManifestSynchronizer::new(self.store, &mut self.tools, &self.locator)
            .convert_html(self.convert_html)
            .synchronize(&manifest, snapshot)
    }

    /// Regenerates the entry file
    ///
    /// # Errors
    ///
    /// See [`ModuleImportResolver::resolve`].
    pub fn sync_imports(&self, snapshot: &DependencySnapshot) -> Result<SyncResult> {
        ModuleImportResolver::new(self.store)
            .convert_html(self.convert_html)
            .resolve(
                &self.paths.entry_file,
                snapshot,
                self.paths.local_root(),
                &self.paths.node_modules,
            )
    }

    /// Renders the webpack config for the configured packaging and paths
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPackaging`](crate::error::NodeSyncError::UnsupportedPackaging)
    /// for an unknown packaging mode, otherwise see
    /// [`BundlerConfigSynchronizer::synchronize`].
    pub fn sync_bundler_config(&self) -> Result<SyncResult> {
        let output = BundlerOutputTarget::resolve(&self.packaging, &self.layout)?;
        debug!(
            "Webpack output for {} packaging: {}",
            output.packaging_mode,
            output.output_directory.display()
        );
        BundlerConfigSynchronizer::new(
            self.store,
            &self.layout.project_root,
            &self.paths.entry_file,
            &self.paths.node_modules,
        )
        .synchronize(&self.template, &self.paths.bundler_config, &output)
    }

    /// Packages, then imports, then the webpack config
    ///
    /// # Errors
    ///
    /// Stops at the first fatal error; a degraded package install does not stop the run.
    pub fn execute(&mut self, snapshot: &DependencySnapshot) -> Result<FrontendReport> {
        let packages = self.sync_packages(snapshot)?;
        let imports = self.sync_imports(snapshot)?;
        let bundler_config = self.sync_bundler_config()?;
        Ok(FrontendReport {
            packages,
            imports,
            bundler_config,
        })
    }

    /// Runs webpack from the project root
    ///
    /// # Errors
    ///
    /// - [`ToolNotFound`](crate::error::NodeSyncError::ToolNotFound) when node or webpack is missing
    /// - [`ToolSpawnFailed`](crate::error::NodeSyncError::ToolSpawnFailed) when node cannot be started
    /// - [`ToolFailed`](crate::error::NodeSyncError::ToolFailed) when webpack exits unsuccessfully
    pub fn bundle(&mut self) -> Result<SyncResult> {
        let webpack = self.locator.bundler_script(self.store)?;
        let node = self.locator.js_runtime(self.store)?;

        info!("Running webpack to compile frontend resources. This may take a moment, please stand by...");
        self.tools.run(
            &node,
            &[webpack.display().to_string()],
            &self.layout.project_root,
            RunMode::Bundler,
        )?;

        let mut result = SyncResult::up_to_date();
        result.record_invocation();
        Ok(result)
    }
}
