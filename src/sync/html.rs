//! Path translation rules for legacy declarations
//!
//! HTML imports and plain scripts predate npm packaging. These rules map them
//! onto the JS modules and npm packages that replaced them, and bring every
//! import into a form the browser (and webpack) accepts.

/// URL schemes resolved against the frontend directory
const FRONTEND_SCHEMES: [&str; 2] = ["frontend://", "context://"];

const BOWER_COMPONENTS: &str = "bower_components/";

/// Replaces a leading `frontend://` or `context://` with `./`
fn strip_scheme(path: &str) -> String {
    FRONTEND_SCHEMES
        .iter()
        .find_map(|scheme| path.strip_prefix(scheme))
        .map_or_else(|| path.to_string(), |rest| format!("./{rest}"))
}

/// npm scope that republished a bower component, if any
fn npm_scope_for(component: &str) -> Option<&'static str> {
    if component.starts_with("vaadin-") {
        Some("@vaadin/")
    } else if component.starts_with("iron-")
        || component.starts_with("paper-")
        || component == "polymer"
    {
        Some("@polymer/")
    } else {
        None
    }
}

/// Maps an HTML import onto the JS module that replaced it
pub fn html_import_to_module(html_import: &str) -> String {
    let mut module = strip_scheme(html_import);

    if let Some(idx) = module.find(BOWER_COMPONENTS) {
        let rest = &module[idx + BOWER_COMPONENTS.len()..];
        let component = rest.split('/').next().unwrap_or_default();
        if let Some(scope) = npm_scope_for(component) {
            module = format!("{scope}{rest}");
        }
    }

    match module.strip_suffix(".html") {
        Some(stem) => format!("{stem}.js"),
        None => module,
    }
}

/// Name of the npm package providing `module`, if it comes from one
pub fn package_of_module(module: &str) -> Option<String> {
    if module.starts_with('.') || module.starts_with('/') {
        return None;
    }
    let mut segments = module.split('/');
    let first = segments.next()?;
    if first.starts_with('@') {
        let name = segments.next().filter(|s| !s.is_empty())?;
        Some(format!("{first}/{name}"))
    } else if module.contains('/') {
        Some(first.to_string())
    } else {
        None
    }
}

/// Maps an HTML import onto the npm package that replaced it
pub fn html_import_to_package(html_import: &str) -> Option<String> {
    package_of_module(&html_import_to_module(html_import))
}

/// Maps a plain script declaration onto a side-effect-only module import
pub fn script_to_module(script: &str) -> String {
    strip_scheme(script)
}

/// Canonical browser form of an import
///
/// Scoped packages and `./`/`../` relative paths are kept, frontend schemes
/// and absolute paths become `./`-relative, anything else stays
/// package-relative.
pub fn to_valid_browser_import(path: &str) -> String {
    let path = strip_scheme(path);
    if path.starts_with('/') {
        format!("./{}", path.trim_start_matches('/'))
    } else {
        path
    }
}
