//! Process-backed [`CommandRunner`]

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};

use super::{CommandRunner, Invocation, ProcessOutput};

/// Spawns real processes with inherited stdout and captured stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

/// Kills the child when dropped, whatever path we leave by
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        // Already exited children report an error here; nothing to clean up then
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

impl CommandRunner for ProcessRunner {
    fn execute(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()?;
        let mut guard = ChildGuard(child);

        // Drain stderr before waiting so a chatty process cannot block on a full pipe
        let mut stderr = String::new();
        if let Some(mut pipe) = guard.0.stderr.take() {
            let mut bytes = Vec::new();
            pipe.read_to_end(&mut bytes)?;
            stderr = String::from_utf8_lossy(&bytes).trim_end().to_string();
        }

        let status = guard.0.wait()?;
        Ok(ProcessOutput {
            code: status.code(),
            stderr,
        })
    }
}
