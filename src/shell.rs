//! Shell helpers shared by the external-tool adapters.
//!
//! The snapshot store and container runtime adapters drive their tools
//! through `sh -c`. These helpers keep quoting and output capture consistent
//! between them.

use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Errors returned while running a shell command.
#[derive(Debug, Error)]
pub enum ShellCommandError {
    /// The shell could not be spawned.
    #[error("failed to spawn shell for `{command}`: {source}")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// Underlying spawn failure.
        #[source]
        source: io::Error,
    },

    /// The command exited unsuccessfully.
    #[error("command `{command}` exited with status {status}: {output}")]
    Failed {
        /// The command line that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Combined standard output and error.
        output: String,
    },
}

/// Escapes a value for safe inclusion in a POSIX shell command.
///
/// Uses single-quote wrapping and the standard `'\''` sequence for embedded
/// quotes.
#[must_use]
pub fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

/// Runs a command line through `sh -c` and returns its standard output.
///
/// # Errors
///
/// Returns [`ShellCommandError::Spawn`] when the shell cannot be started and
/// [`ShellCommandError::Failed`] when the command exits non-zero.
pub async fn run_shell(command: &str) -> Result<String, ShellCommandError> {
    tracing::debug!(command, "running shell command");
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ShellCommandError::Spawn {
            command: command.to_owned(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(ShellCommandError::Failed {
        command: command.to_owned(),
        status: output.status.to_string(),
        output: format!("{stdout}{stderr}").trim().to_owned(),
    })
}
