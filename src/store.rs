//! File access used by the synchronizers
//!
//! Every synchronizer reads and writes whole files through [`FileStore`], so
//! the merge and resolution logic can run against an in-memory store in tests.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Whole-file text storage
pub trait FileStore {
    /// Reads a UTF-8 file, returning `None` when it does not exist
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replaces the file contents, creating parent directories as needed
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Returns true when `path` names an existing regular file
    fn is_file(&self, path: &Path) -> bool;
}

/// [`FileStore`] backed by the local file system
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Write next to the target and rename so readers never see a torn file
        let mut tmp = NamedTempFile::new_in(parent)?;
        if let Some(permissions) = target_permissions(path)? {
            tmp.as_file().set_permissions(permissions)?;
        }
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Permissions of the file being replaced, or the usual ones for a new file
fn target_permissions(path: &Path) -> io::Result<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
