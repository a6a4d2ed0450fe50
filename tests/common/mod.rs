//! Common test utilities for nodesync integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway frontend project
#[allow(dead_code)]
pub struct TestProject {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Create a new, empty project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write the declared dependencies (frontend.yaml)
    pub fn declare(&self, yaml: &str) {
        self.write_file("frontend.yaml", yaml);
    }

    /// Create empty files standing in for installed or local JS modules
    pub fn touch_all(&self, paths: &[&str]) {
        for path in paths {
            self.write_file(path, "");
        }
    }

    /// Install a fake project-local Node.js
    ///
    /// `body` is the shell script run for every `node` invocation. Every
    /// invocation's arguments are appended to `node/invocations.log` first.
    /// A stub npm-cli.js is created so npm resolves to this node as well.
    #[cfg(unix)]
    pub fn fake_node(&self, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let log = self.path.join("node/invocations.log");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\n{body}\n",
            log.display()
        );
        self.write_file("node/node", &script);
        std::fs::set_permissions(
            self.path.join("node/node"),
            std::fs::Permissions::from_mode(0o755),
        )
        .expect("Failed to make fake node executable");
        self.write_file("node/node_modules/npm/bin/npm-cli.js", "");
    }

    /// Argument lines the fake node was invoked with
    pub fn node_invocations(&self) -> Vec<String> {
        std::fs::read_to_string(self.path.join("node/invocations.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// A nodesync command running inside this project
    pub fn nodesync_cmd(&self) -> Command {
        let mut cmd = nodesync_cmd();
        cmd.current_dir(&self.path);
        cmd
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// The nodesync binary, isolated from the caller's environment
// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated, dead_code)]
pub fn nodesync_cmd() -> Command {
    let mut cmd = Command::cargo_bin("nodesync").expect("nodesync binary is built");
    cmd.env_remove("NODESYNC_PROJECT").env_remove("NODESYNC_LOG");
    cmd
}
