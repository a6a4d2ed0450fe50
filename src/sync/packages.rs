//! package.json synchronization
//!
//! Declared npm packages that package.json does not list yet are merged into
//! it and installed with npm. The same diff-then-install step runs for the
//! fixed set of build tooling in `devDependencies`.
//!
//! The merge decisions ([`required_packages`], [`missing_dev_packages`]) are
//! pure functions over the manifest and the snapshot; only
//! [`PackageManifestSynchronizer`] touches files or spawns npm.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::SyncResult;
use super::html::html_import_to_package;
use crate::domain::DependencySnapshot;
use crate::error::{Result, manifest};
use crate::runner::{CommandRunner, ExternalToolRunner, RunMode, RunResult, ToolLocator};
use crate::store::FileStore;

/// Web components polyfill every application needs at runtime
pub const BASELINE_PACKAGE: &str = "@webcomponents/webcomponentsjs";

/// Package generated from project sources, never installed from a registry
pub const RESERVED_PACKAGE: &str = "@vaadin/flow-frontend";

/// Build tooling required in `devDependencies`
pub const DEV_TOOLING: [&str; 5] = [
    "webpack",
    "webpack-cli",
    "webpack-dev-server",
    "webpack-babel-multi-target-plugin",
    "copy-webpack-plugin",
];

/// Constraint written for freshly merged entries; npm pins a real version on install
const MERGED_CONSTRAINT: &str = "*";

/// One of the two dependency sections of package.json
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dependencies,
    DevDependencies,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        }
    }

    fn save_flag(self) -> &'static str {
        match self {
            Self::Dependencies => "--save",
            Self::DevDependencies => "--save-dev",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Dependencies => "npm packages",
            Self::DevDependencies => "npm dev packages",
        }
    }
}

/// In-memory package.json
///
/// The parsed document is kept as read, so keys other than the two dependency
/// sections are carried through untouched and every key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageManifest {
    document: Map<String, Value>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Parses package.json text
    ///
    /// The flag is false when either dependency section is missing from the
    /// text, meaning the file must be rewritten to include it.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestParse`](crate::error::NodeSyncError::ManifestParse) for
    /// invalid JSON or non-string dependency entries.
    pub fn from_json(path: &Path, text: &str) -> Result<(Self, bool)> {
        let value: Value = serde_json::from_str(text).map_err(|e| manifest::parse_failed(path, e))?;
        let Value::Object(document) = value else {
            return Err(manifest::parse_failed(path, "expected a JSON object"));
        };

        let section = |section: Section| -> Result<Option<BTreeMap<String, String>>> {
            document
                .get(section.key())
                .map(|entries| serde_json::from_value(entries.clone()))
                .transpose()
                .map_err(|e| manifest::parse_failed(path, e))
        };
        let dependencies = section(Section::Dependencies)?;
        let dev_dependencies = section(Section::DevDependencies)?;
        let complete = dependencies.is_some() && dev_dependencies.is_some();

        let parsed = Self {
            dependencies: dependencies.unwrap_or_default(),
            dev_dependencies: dev_dependencies.unwrap_or_default(),
            document,
        };
        Ok((parsed, complete))
    }

    /// Pretty-printed JSON with a trailing newline, as npm writes it
    ///
    /// Existing sections are replaced where they stand; missing ones are
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestParse`](crate::error::NodeSyncError::ManifestParse) if
    /// serialization fails.
    pub fn to_json(&self, path: &Path) -> Result<String> {
        let mut document = self.document.clone();
        for section in [Section::Dependencies, Section::DevDependencies] {
            let entries = match section {
                Section::Dependencies => &self.dependencies,
                Section::DevDependencies => &self.dev_dependencies,
            };
            let entries = serde_json::to_value(entries).map_err(|e| manifest::parse_failed(path, e))?;
            document.insert(section.key().to_string(), entries);
        }

        let mut json = serde_json::to_string_pretty(&document).map_err(|e| manifest::parse_failed(path, e))?;
        json.push('\n');
        Ok(json)
    }

    fn section_mut(&mut self, section: Section) -> &mut BTreeMap<String, String> {
        match section {
            Section::Dependencies => &mut self.dependencies,
            Section::DevDependencies => &mut self.dev_dependencies,
        }
    }
}

fn is_bare_js_file(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.to_ascii_lowercase().ends_with(".js")
}

fn is_reserved(name: &str) -> bool {
    name.strip_prefix(RESERVED_PACKAGE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Whether a declared package name can be requested from npm
pub fn is_installable(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.starts_with('/')
        && !is_bare_js_file(name)
        && !is_reserved(name)
}

/// Every package name the snapshot declares
///
/// In HTML compatibility mode this includes the packages that replaced HTML
/// imports of components without a native declaration.
pub fn declared_packages(snapshot: &DependencySnapshot, convert_html: bool) -> BTreeSet<String> {
    let mut declared = snapshot.packages.clone();
    if convert_html {
        declared.extend(
            snapshot
                .html_imports
                .iter()
                .filter(|import| !import.native_equivalent)
                .filter_map(|import| html_import_to_package(&import.path)),
        );
    }
    declared
}

/// Packages that must be added to `dependencies`
pub fn required_packages(
    manifest: &PackageManifest,
    snapshot: &DependencySnapshot,
    convert_html: bool,
) -> BTreeSet<String> {
    let mut required: BTreeSet<String> = declared_packages(snapshot, convert_html)
        .into_iter()
        .filter(|name| is_installable(name) && !manifest.dependencies.contains_key(name))
        .collect();

    if !manifest.dependencies.contains_key(BASELINE_PACKAGE) {
        required.insert(BASELINE_PACKAGE.to_string());
    }
    required
}

/// Build tooling that must be added to `devDependencies`
pub fn missing_dev_packages(manifest: &PackageManifest) -> BTreeSet<String> {
    DEV_TOOLING
        .iter()
        .filter(|name| !manifest.dev_dependencies.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect()
}

/// Keeps package.json and `node_modules` in line with declared packages
pub struct PackageManifestSynchronizer<'a, S: FileStore, R: CommandRunner> {
    store: &'a S,
    tools: &'a mut ExternalToolRunner<R>,
    locator: &'a ToolLocator,
    convert_html: bool,
}

impl<'a, S: FileStore, R: CommandRunner> PackageManifestSynchronizer<'a, S, R> {
    pub fn new(store: &'a S, tools: &'a mut ExternalToolRunner<R>, locator: &'a ToolLocator) -> Self {
        Self {
            store,
            tools,
            locator,
            convert_html: true,
        }
    }

    #[must_use]
    pub fn convert_html(mut self, convert_html: bool) -> Self {
        self.convert_html = convert_html;
        self
    }

    /// Brings the manifest at `manifest_path` up to date with `snapshot`
    ///
    /// A failing npm run is not an error: the manifest edit for that run is
    /// rolled back and the result is [`Degraded`](super::SyncStatus::Degraded).
    ///
    /// # Errors
    ///
    /// - [`ManifestIo`](crate::error::NodeSyncError::ManifestIo) when package.json cannot be read or written
    /// - [`ManifestParse`](crate::error::NodeSyncError::ManifestParse) when it is not valid
    /// - [`ToolNotFound`](crate::error::NodeSyncError::ToolNotFound) when npm is needed but missing
    /// - [`ToolSpawnFailed`](crate::error::NodeSyncError::ToolSpawnFailed) when npm cannot be started
    pub fn synchronize(
        &mut self,
        manifest_path: &Path,
        snapshot: &DependencySnapshot,
    ) -> Result<SyncResult> {
        let mut result = SyncResult::up_to_date();
        let mut current = self.load_or_create(manifest_path, &mut result)?;

        for section in [Section::Dependencies, Section::DevDependencies] {
            let missing = match section {
                Section::Dependencies => required_packages(&current, snapshot, self.convert_html),
                Section::DevDependencies => missing_dev_packages(&current),
            };
            if missing.is_empty() {
                info!("No {} to update", section.label());
                continue;
            }
            current = self.install(manifest_path, current, &missing, section, &mut result)?;
        }

        Ok(result)
    }

    fn read(&self, path: &Path) -> Result<Option<(PackageManifest, bool)>> {
        let text = self.store.read(path).map_err(|e| manifest::io(path, e))?;
        text.map(|text| PackageManifest::from_json(path, &text))
            .transpose()
    }

    fn load_or_create(&self, path: &Path, result: &mut SyncResult) -> Result<PackageManifest> {
        let (loaded, complete) = match self.read(path)? {
            Some(loaded) => loaded,
            None => {
                info!("Creating a default {}", path.display());
                (PackageManifest::default(), false)
            }
        };

        if !complete {
            self.persist(path, &loaded)?;
            result.record_write(path);
        }
        Ok(loaded)
    }

    fn persist(&self, path: &Path, manifest: &PackageManifest) -> Result<()> {
        let json = manifest.to_json(path)?;
        self.store
            .write(path, &json)
            .map_err(|e| manifest::io(path, e))
    }

    fn install(
        &mut self,
        path: &Path,
        current: PackageManifest,
        packages: &BTreeSet<String>,
        section: Section,
        result: &mut SyncResult,
    ) -> Result<PackageManifest> {
        // Resolve npm first so a missing tool leaves no merged entries behind
        let npm = self.locator.package_manager(self.store)?;
        let args = npm.with_args(
            ["--no-package-lock", "install", section.save_flag()]
                .map(str::to_string)
                .into_iter()
                .chain(packages.iter().cloned()),
        );

        let mut merged = current.clone();
        merged.section_mut(section).extend(
            packages
                .iter()
                .map(|name| (name.clone(), MERGED_CONSTRAINT.to_string())),
        );
        self.persist(path, &merged)?;
        result.record_write(path);

        info!(
            "Updating package.json and installing {} ...\n {} {}",
            section.label(),
            npm.program.display(),
            args.join(" ")
        );
        result.record_invocation();
        let outcome = self.tools.run(
            &npm.program,
            &args,
            self.locator.npm_folder(),
            RunMode::PackageManager,
        )?;

        match outcome {
            RunResult::Succeeded => {
                info!("package.json updated and {} installed.", section.label());
                // npm rewrites the manifest with the versions it resolved
                Ok(self.read(path)?.map_or(merged, |(reloaded, _)| reloaded))
            }
            RunResult::Failed { code, stderr } => {
                warn!(
                    "Restoring {} so the next run retries: {}",
                    path.display(),
                    packages.iter().cloned().collect::<Vec<_>>().join(" ")
                );
                self.persist(path, &current)?;
                result.record_write(path);
                let code = code.map_or_else(|| "<signal>".to_string(), |c| c.to_string());
                let mut reason = format!("npm exited with code {code} while installing {}", section.label());
                if !stderr.is_empty() {
                    reason.push_str(": ");
                    reason.push_str(&stderr);
                }
                result.degrade(reason);
                Ok(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::HtmlImport;
    use crate::error::NodeSyncError;
    use crate::sync::SyncStatus;
    use crate::test_fixtures::{MemoryStore, RecordingRunner};

    const MANIFEST: &str = "/project/package.json";

    fn npm_on_path(name: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(name))
    }

    fn nothing_on_path(_: &str) -> Option<PathBuf> {
        None
    }

    fn locator() -> ToolLocator {
        ToolLocator::new("/project", "/project/node_modules").with_system_lookup(npm_on_path)
    }

    fn snapshot(packages: &[&str]) -> DependencySnapshot {
        DependencySnapshot {
            packages: packages.iter().map(|p| (*p).to_string()).collect(),
            ..DependencySnapshot::default()
        }
    }

    fn sync(
        store: &MemoryStore,
        tools: &mut ExternalToolRunner<RecordingRunner>,
        snapshot: &DependencySnapshot,
    ) -> Result<SyncResult> {
        let locator = locator();
        PackageManifestSynchronizer::new(store, tools, &locator).synchronize(Path::new(MANIFEST), snapshot)
    }

    fn parsed(store: &MemoryStore) -> PackageManifest {
        let text = store.contents(MANIFEST).unwrap();
        PackageManifest::from_json(Path::new(MANIFEST), &text).unwrap().0
    }

    fn full_manifest() -> String {
        r#"{
  "name": "no-name",
  "dependencies": { "@webcomponents/webcomponentsjs": "^2.2.9", "@polymer/iron-icon": "^3.0.1" },
  "devDependencies": {
    "webpack": "4.30.0",
    "webpack-cli": "3.3.0",
    "webpack-dev-server": "3.3.0",
    "webpack-babel-multi-target-plugin": "2.1.0",
    "copy-webpack-plugin": "5.0.3"
  }
}"#
        .to_string()
    }

    #[test]
    fn test_missing_manifest_is_created_with_both_sections() {
        let store = MemoryStore::new();
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        let result = sync(&store, &mut tools, &DependencySnapshot::default()).unwrap();

        let text = store.contents(MANIFEST).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value["dependencies"].is_object());
        assert!(value["devDependencies"].is_object());
        assert_eq!(result.status, SyncStatus::Updated);
        // baseline package, then dev tooling
        assert_eq!(tools.invocations(), 2);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let store = MemoryStore::new();
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());
        let declared = snapshot(&["@polymer/iron-icon"]);

        sync(&store, &mut tools, &declared).unwrap();
        store.clear_writes();
        let before = tools.invocations();

        let result = sync(&store, &mut tools, &declared).unwrap();

        assert!(result.is_up_to_date());
        assert!(store.writes().is_empty());
        assert_eq!(tools.invocations(), before);
    }

    #[test]
    fn test_complete_manifest_needs_nothing() {
        let store = MemoryStore::new().with_file(MANIFEST, &full_manifest());
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        let result = sync(&store, &mut tools, &snapshot(&["@polymer/iron-icon"])).unwrap();

        assert!(result.is_up_to_date());
        assert!(store.writes().is_empty());
        assert_eq!(tools.invocations(), 0);
    }

    #[test]
    fn test_npm_command_line() {
        let store = MemoryStore::new().with_file(MANIFEST, &full_manifest());
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        sync(&store, &mut tools, &snapshot(&["@vaadin/vaadin-button", "@polymer/iron-icon"])).unwrap();

        let recorded = tools.inner().invocations();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].program, PathBuf::from("/usr/bin/npm"));
        assert_eq!(
            recorded[0].args,
            vec!["--no-package-lock", "install", "--save", "@vaadin/vaadin-button"]
        );
        assert_eq!(recorded[0].working_dir, PathBuf::from("/project"));
    }

    #[test]
    fn test_dev_dependencies_only_request_missing_tooling() {
        let store = MemoryStore::new().with_file(
            MANIFEST,
            r#"{"dependencies": {"@webcomponents/webcomponentsjs": "^2.2.9"}, "devDependencies": {"webpack": "4.30.0"}}"#,
        );
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        sync(&store, &mut tools, &DependencySnapshot::default()).unwrap();

        let recorded = tools.inner().invocations();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].args,
            vec![
                "--no-package-lock",
                "install",
                "--save-dev",
                "copy-webpack-plugin",
                "webpack-babel-multi-target-plugin",
                "webpack-cli",
                "webpack-dev-server",
            ]
        );
    }

    #[test]
    fn test_local_and_reserved_names_are_filtered() {
        let manifest = PackageManifest::default();
        let declared = snapshot(&[
            "./local-module",
            "/absolute/module",
            "foo.js",
            "Foo.JS",
            "@vaadin/flow-frontend",
            "@vaadin/flow-frontend/ExampleConnector.js",
            "@vaadin/flow-frontend-extras",
            "@polymer/iron-icon",
        ]);

        let required = required_packages(&manifest, &declared, false);

        let expected: BTreeSet<String> = [
            "@polymer/iron-icon",
            "@vaadin/flow-frontend-extras",
            BASELINE_PACKAGE,
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        assert_eq!(required, expected);
    }

    #[test]
    fn test_html_imports_without_native_equivalent_contribute_packages() {
        let mut declared = DependencySnapshot::default();
        declared.html_imports.insert(HtmlImport::new(
            "frontend://bower_components/vaadin-button/src/vaadin-button.html",
        ));
        declared.html_imports.insert(HtmlImport::with_native_equivalent(
            "frontend://bower_components/vaadin-grid/src/vaadin-grid.html",
        ));

        let with_html = declared_packages(&declared, true);
        assert!(with_html.contains("@vaadin/vaadin-button"));
        assert!(!with_html.contains("@vaadin/vaadin-grid"));

        assert!(declared_packages(&declared, false).is_empty());
    }

    #[test]
    fn test_npm_failure_degrades_and_restores_manifest() {
        let store = MemoryStore::new().with_file(MANIFEST, &full_manifest());
        let mut tools = ExternalToolRunner::new(RecordingRunner::exiting(1, "E404 Not Found"));
        let declared = snapshot(&["@vaadin/does-not-exist"]);

        let result = sync(&store, &mut tools, &declared).unwrap();

        assert!(result.is_degraded());
        assert!(!parsed(&store).dependencies.contains_key("@vaadin/does-not-exist"));
        match result.status {
            SyncStatus::Degraded { reason } => assert!(reason.contains("E404 Not Found")),
            other => panic!("expected degraded result, got {other:?}"),
        }

        // The next run retries the install
        let mut retry = ExternalToolRunner::new(RecordingRunner::succeeding());
        sync(&store, &mut retry, &declared).unwrap();
        assert_eq!(retry.invocations(), 1);
        assert!(parsed(&store).dependencies.contains_key("@vaadin/does-not-exist"));
    }

    #[test]
    fn test_other_keys_survive_rewrite() {
        let store = MemoryStore::new().with_file(MANIFEST, r#"{"name": "my-app", "version": "1.0.0", "license": "UNLICENSED"}"#);
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        sync(&store, &mut tools, &DependencySnapshot::default()).unwrap();

        let manifest = parsed(&store);
        let keys: Vec<_> = manifest.document.keys().cloned().collect();
        assert_eq!(keys, vec!["name", "version", "license", "dependencies", "devDependencies"]);
        assert_eq!(manifest.document["name"], Value::from("my-app"));
    }

    #[test]
    fn test_sections_keep_their_position() {
        let store = MemoryStore::new().with_file(
            MANIFEST,
            r#"{"dependencies": {}, "name": "my-app", "devDependencies": {}, "version": "1.0.0"}"#,
        );
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        sync(&store, &mut tools, &snapshot(&["@polymer/iron-icon"])).unwrap();

        let manifest = parsed(&store);
        let keys: Vec<_> = manifest.document.keys().cloned().collect();
        assert_eq!(keys, vec!["dependencies", "name", "devDependencies", "version"]);
        assert_eq!(manifest.dependencies["@polymer/iron-icon"], MERGED_CONSTRAINT);
        assert!(manifest.dev_dependencies.contains_key("webpack"));
    }

    #[test]
    fn test_non_object_manifest_is_parse_error() {
        let err = PackageManifest::from_json(Path::new(MANIFEST), "[]").unwrap_err();
        assert!(matches!(err, NodeSyncError::ManifestParse { .. }));
    }

    #[test]
    fn test_missing_npm_is_fatal_and_merges_nothing() {
        let store = MemoryStore::new().with_file(MANIFEST, r#"{"dependencies": {}, "devDependencies": {}}"#);
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());
        let locator = ToolLocator::new("/project", "/project/node_modules").with_system_lookup(nothing_on_path);

        let err = PackageManifestSynchronizer::new(&store, &mut tools, &locator)
            .synchronize(Path::new(MANIFEST), &DependencySnapshot::default())
            .unwrap_err();

        assert!(matches!(err, NodeSyncError::ToolNotFound { .. }));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_unreadable_manifest_is_io_error() {
        let store = MemoryStore::new().with_unreadable(MANIFEST);
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        let err = sync(&store, &mut tools, &DependencySnapshot::default()).unwrap_err();

        assert!(matches!(err, NodeSyncError::ManifestIo { .. }));
        assert!(err.to_string().contains(MANIFEST));
    }

    #[test]
    fn test_unwritable_manifest_is_io_error() {
        let store = MemoryStore::new().with_read_only(MANIFEST);
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        let err = sync(&store, &mut tools, &DependencySnapshot::default()).unwrap_err();

        assert!(matches!(err, NodeSyncError::ManifestIo { .. }));
        assert_eq!(tools.invocations(), 0);
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let store = MemoryStore::new().with_file(MANIFEST, "{ not json");
        let mut tools = ExternalToolRunner::new(RecordingRunner::succeeding());

        let err = sync(&store, &mut tools, &DependencySnapshot::default()).unwrap_err();

        assert!(matches!(err, NodeSyncError::ManifestParse { .. }));
    }
}
