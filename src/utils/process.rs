//! Structured subprocess invocation
//!
//! Commands are always spawned from an argument vector, never through a shell,
//! so paths and the sudo password need no quoting.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output for a command that could not be started at all
    pub fn spawn_failure(program: &str, err: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: format!("failed to run {}: {}", program, err),
        }
    }

    pub fn failed(&self) -> bool {
        !self.success
    }

    /// Best description of a failure: stderr, else stdout
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Run `program` with `args`, optionally feeding `stdin`.
///
/// Never returns an error: spawn and I/O failures are folded into an
/// unsuccessful [`CommandOutput`] for the caller to interpret.
pub async fn run_command(program: &str, args: &[&str], stdin: Option<&str>) -> CommandOutput {
    log::debug!("Running: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return CommandOutput::spawn_failure(program, e),
    };

    if let Some(input) = stdin {
        if let Some(mut pipe) = child.stdin.take() {
            if let Err(e) = pipe.write_all(input.as_bytes()).await {
                log::debug!("Failed to write stdin of {}: {}", program, e);
            }
            // Dropping the pipe closes stdin so the child sees EOF
        }
    }

    match child.wait_with_output().await {
        Ok(output) => {
            let result = CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            };
            log::trace!("{} exited with success={}", program, result.success);
            result
        }
        Err(e) => CommandOutput::spawn_failure(program, e),
    }
}

/// Check whether `tool` resolves on PATH
pub fn is_tool_available(tool: &str) -> bool {
    which::which(tool).is_ok()
}
