//! Declared frontend dependencies
//!
//! A [`DependencySnapshot`] is produced once per run by whatever collects
//! component metadata and is only ever read by the synchronizers.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Frontend dependencies declared by the project's components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencySnapshot {
    /// npm package identifiers
    pub packages: BTreeSet<String>,

    /// JS module paths, either `./`-relative or package-relative
    pub modules: BTreeSet<String>,

    /// Plain script paths, imported for their side effects
    pub scripts: BTreeSet<String>,

    /// Legacy HTML imports, only considered in HTML compatibility mode
    pub html_imports: BTreeSet<HtmlImport>,

    /// Theme applied to the application, if any
    pub theme: Option<ThemeDescriptor>,
}

impl DependencySnapshot {
    /// Returns true when nothing at all is declared
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
            && self.modules.is_empty()
            && self.scripts.is_empty()
            && self.html_imports.is_empty()
            && self.theme.is_none()
    }
}

/// An HTML import declaration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HtmlImport {
    /// Path as declared, e.g. `frontend://bower_components/vaadin-button/src/vaadin-button.html`
    pub path: String,

    /// Whether the declaring component also declares a JS module or npm package.
    /// Such imports still contribute modules but never packages.
    #[serde(default)]
    pub native_equivalent: bool,
}

#[cfg(test)]
impl HtmlImport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            native_equivalent: false,
        }
    }

    pub fn with_native_equivalent(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            native_equivalent: true,
        }
    }
}

/// Theme applied before any other import in the entry file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    /// Path fragment identifying un-themed component sources, e.g. `src/`
    pub base_url: String,

    /// Replacement for `base_url` in themed paths, e.g. `theme/lumo/`
    pub theme_url: String,

    /// Raw HTML snippets inserted at the top of the document head
    #[serde(default)]
    pub header_inline_contents: Vec<String>,

    /// Attributes set on the document body, in declaration order
    #[serde(default)]
    pub html_attributes: IndexMap<String, String>,
}

impl ThemeDescriptor {
    #[cfg(test)]
    pub fn new(base_url: impl Into<String>, theme_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            theme_url: theme_url.into(),
            ..Self::default()
        }
    }

    /// Whether `path` points at something this theme provides a variant for
    pub fn applies_to(&self, path: &str) -> bool {
        !self.base_url.is_empty() && path.contains(&self.base_url)
    }

    /// Rewrites the first occurrence of the base URL with the theme URL
    pub fn translate(&self, path: &str) -> String {
        if self.applies_to(path) {
            path.replacen(&self.base_url, &self.theme_url, 1)
        } else {
            path.to_string()
        }
    }
}
