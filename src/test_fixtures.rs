//! Test fixtures and fakes for reducing test setup duplication.
//!
//! - [`MemoryStore`]: an in-memory [`FileStore`] that counts writes
//! - [`RecordingRunner`]: a [`CommandRunner`] that records invocations and
//!   replays scripted exit codes instead of spawning processes
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{MemoryStore, RecordingRunner};
//!
//! #[test]
//! fn my_test() {
//!     let store = MemoryStore::new().with_file("/project/package.json", "{}");
//!     let runner = RecordingRunner::succeeding();
//! }
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::runner::{CommandRunner, Invocation, ProcessOutput};
use crate::store::FileStore;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples and creates those files.
/// Paths are relative to the provided base directory.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(temp: &TempDir, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// In-memory [`FileStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeMap<PathBuf, String>>,
    writes: RefCell<Vec<PathBuf>>,
    read_only: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file without counting it as a write
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.to_string());
        self
    }

    /// Makes writes to `path` fail with permission denied
    #[must_use]
    pub fn with_read_only(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    /// Makes reads of `path` fail with permission denied
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Every path written so far, in write order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl FileStore for MemoryStore {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.read_only.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Exit(i32, String),
    Unspawnable,
}

/// [`CommandRunner`] that never spawns anything
#[derive(Debug)]
pub struct RecordingRunner {
    invocations: Vec<Invocation>,
    queued: VecDeque<Scripted>,
    fallback: Scripted,
}

impl RecordingRunner {
    /// Every invocation exits with 0
    pub fn succeeding() -> Self {
        Self::exiting(0, "")
    }

    /// Every invocation exits with `code` after printing `stderr`
    pub fn exiting(code: i32, stderr: &str) -> Self {
        Self {
            invocations: Vec::new(),
            queued: VecDeque::new(),
            fallback: Scripted::Exit(code, stderr.to_string()),
        }
    }

    /// Every invocation fails to start
    pub fn unspawnable() -> Self {
        Self {
            invocations: Vec::new(),
            queued: VecDeque::new(),
            fallback: Scripted::Unspawnable,
        }
    }

    /// Queues an outcome for the next unscripted invocation
    #[must_use]
    pub fn then_exit(mut self, code: i32, stderr: &str) -> Self {
        self.queued.push_back(Scripted::Exit(code, stderr.to_string()));
        self
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        self.invocations.push(invocation.clone());
        match self.queued.pop_front().unwrap_or_else(|| self.fallback.clone()) {
            Scripted::Exit(code, stderr) => Ok(ProcessOutput {
                code: Some(code),
                stderr,
            }),
            Scripted::Unspawnable => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_files() {
        let temp = create_temp_dir();
        create_test_files(&temp, &[("frontend/foo.js", "export {};")]);
        let content = std::fs::read_to_string(temp.path().join("frontend/foo.js")).unwrap();
        assert_eq!(content, "export {};");
    }

    #[test]
    fn test_memory_store_counts_writes_only() {
        let store = MemoryStore::new().with_file("/a.js", "seed");
        assert!(store.writes().is_empty());
        store.write(Path::new("/b.js"), "new").unwrap();
        assert_eq!(store.writes(), vec![PathBuf::from("/b.js")]);
        assert!(store.is_file(Path::new("/a.js")));
    }

    #[test]
    fn test_memory_store_normalizes_current_dir_components() {
        let store = MemoryStore::new().with_file("/project/frontend/a.js", "");
        assert!(store.is_file(&Path::new("/project/frontend").join("./a.js")));
    }

    #[test]
    fn test_recording_runner_queue_then_fallback() {
        let mut runner = RecordingRunner::succeeding().then_exit(1, "boom");
        let inv = Invocation {
            program: PathBuf::from("npm"),
            args: Vec::new(),
            working_dir: PathBuf::from("/"),
        };
        assert_eq!(runner.execute(&inv).unwrap().code, Some(1));
        assert_eq!(runner.execute(&inv).unwrap().code, Some(0));
        assert_eq!(runner.invocations().len(), 2);
    }
}
