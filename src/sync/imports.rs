//! Entry file generation
//!
//! The entry file (`frontend/main.js` by default) is webpack's entry point:
//! theme setup statements followed by one `import` per declared module.
//! Imports are emitted in reverse lexicographic order so the output is
//! byte-identical across runs no matter how the declarations were collected.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use tracing::info;

use super::SyncResult;
use super::html::{html_import_to_module, script_to_module, to_valid_browser_import};
use crate::domain::{DependencySnapshot, ThemeDescriptor};
use crate::error::{Result, imports};
use crate::store::FileStore;

/// A declared import that exists neither in the project nor in `node_modules`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedImport {
    pub original_path: String,
    /// Equal to `original_path` unless the theme rewrote it
    pub translated_path: String,
}

impl UnresolvedImport {
    pub fn new(original_path: impl Into<String>, translated_path: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            translated_path: translated_path.into(),
        }
    }
}

impl fmt::Display for UnresolvedImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.translated_path)?;
        if self.original_path != self.translated_path {
            write!(
                f,
                " (the import was translated from the path '{}')",
                self.original_path
            )?;
        }
        Ok(())
    }
}

/// Every import the entry file needs, canonical, deduplicated and in emission order
pub fn collect_imports(snapshot: &DependencySnapshot, convert_html: bool) -> Vec<String> {
    let mut modules: BTreeSet<String> = snapshot.modules.clone();
    if convert_html {
        modules.extend(
            snapshot
                .html_imports
                .iter()
                .map(|import| html_import_to_module(&import.path)),
        );
    }
    modules.extend(snapshot.scripts.iter().map(|script| script_to_module(script)));

    let canonical: BTreeSet<String> = modules
        .iter()
        .map(|module| to_valid_browser_import(module))
        .collect();
    canonical.into_iter().rev().collect()
}

/// Picks the path to import for each entry, preferring the themed variant
///
/// # Errors
///
/// Returns every import for which neither the themed nor the original path
/// exists, in input order.
pub fn resolve_imports(
    imports: &[String],
    theme: Option<&ThemeDescriptor>,
    exists: impl Fn(&str) -> bool,
) -> std::result::Result<Vec<String>, Vec<UnresolvedImport>> {
    let mut resolved = Vec::with_capacity(imports.len());
    let mut unresolved = Vec::new();

    for original in imports {
        let translated = theme.map_or_else(|| original.clone(), |t| t.translate(original));
        if exists(&translated) {
            resolved.push(translated);
        } else if exists(original) {
            resolved.push(original.clone());
        } else {
            unresolved.push(UnresolvedImport::new(original.clone(), translated));
        }
    }

    if unresolved.is_empty() {
        Ok(resolved)
    } else {
        Err(unresolved)
    }
}

/// Collapses a multi-line HTML snippet onto one line
///
/// Leading whitespace of every line goes, as does one whitespace character
/// in front of each line break.
fn collapse_html(html: &str) -> String {
    let segments: Vec<&str> = html.split('\n').collect();
    let last = segments.len().saturating_sub(1);
    let mut out = String::with_capacity(html.len());
    for (i, segment) in segments.into_iter().enumerate() {
        let mut segment = segment.trim_start();
        if i < last {
            if let Some(c) = segment.chars().last().filter(|c| c.is_whitespace()) {
                segment = &segment[..segment.len() - c.len_utf8()];
            }
        }
        out.push_str(segment);
    }
    out
}

/// Escapes text for a single-quoted JS string literal
fn js_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Entry file content: theme setup first, then one import per line
pub fn entry_file_lines(theme: Option<&ThemeDescriptor>, imports: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(theme) = theme {
        if !theme.header_inline_contents.is_empty() {
            lines.push("const div = document.createElement('div');".to_string());
            for html in &theme.header_inline_contents {
                lines.push(format!("div.innerHTML = '{}';", js_string(&collapse_html(html))));
                lines.push(
                    "document.head.insertBefore(div.firstElementChild, document.head.firstChild);"
                        .to_string(),
                );
            }
        }
        for (name, value) in &theme.html_attributes {
            lines.push(format!(
                "document.body.setAttribute('{}', '{}');",
                js_string(name),
                js_string(value)
            ));
        }
    }

    lines.extend(imports.iter().map(|import| format!("import '{}';", js_string(import))));
    lines
}

/// Regenerates the entry file from declared modules
pub struct ModuleImportResolver<'a, S: FileStore> {
    store: &'a S,
    convert_html: bool,
}

impl<'a, S: FileStore> ModuleImportResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            convert_html: true,
        }
    }

    #[must_use]
    pub fn convert_html(mut self, convert_html: bool) -> Self {
        self.convert_html = convert_html;
        self
    }

    /// Rewrites `entry_file` when its content differs from what `snapshot` needs
    ///
    /// `./` imports resolve against `local_root`, everything else against
    /// `node_modules`.
    ///
    /// # Errors
    ///
    /// - [`UnresolvedImports`](crate::error::NodeSyncError::UnresolvedImports) listing every missing import; the file is left untouched
    /// - [`EntryFileIo`](crate::error::NodeSyncError::EntryFileIo) when the entry file cannot be read or written
    pub fn resolve(
        &self,
        entry_file: &Path,
        snapshot: &DependencySnapshot,
        local_root: &Path,
        node_modules: &Path,
    ) -> Result<SyncResult> {
        let declared = collect_imports(snapshot, self.convert_html);
        let theme = snapshot.theme.as_ref();

        let resolved = resolve_imports(&declared, theme, |import| {
            let root = if import.starts_with("./") {
                local_root
            } else {
                node_modules
            };
            self.store.is_file(&root.join(import))
        })
        .map_err(|unresolved| imports::unresolved(node_modules, unresolved))?;

        let lines = entry_file_lines(theme, &resolved);
        self.write_if_changed(entry_file, &lines)
    }

    fn write_if_changed(&self, entry_file: &Path, lines: &[String]) -> Result<SyncResult> {
        let existing = self
            .store
            .read(entry_file)
            .map_err(|e| imports::io(entry_file, e))?;

        let unchanged = existing
            .as_deref()
            .is_some_and(|old| old.lines().eq(lines.iter().map(String::as_str)));
        if unchanged {
            info!("No js modules to update");
            return Ok(SyncResult::up_to_date());
        }

        self.store
            .write(entry_file, &lines.join("\n"))
            .map_err(|e| imports::io(entry_file, e))?;
        info!("Updated {}", entry_file.display());

        let mut result = SyncResult::up_to_date();
        result.record_write(entry_file);
        Ok(result)
    }
}
