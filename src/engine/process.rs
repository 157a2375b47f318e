//! External process execution

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished child process
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Last non-empty stderr line, falling back to the exit status
    pub fn error_summary(&self) -> String {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("exited with {}", self.status))
    }
}

/// Run a tool to completion, capturing stdout and stderr.
///
/// Only spawn failures are errors here; a non-zero exit is reported through
/// [`ToolOutput::status`] so callers can classify it.
pub async fn run_tool<P, I, S>(program: P, args: I) -> std::io::Result<ToolOutput>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program.as_ref());
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = ?program.as_ref(), "Spawning external tool");
    let output = command.output().await?;

    Ok(ToolOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
