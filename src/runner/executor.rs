//! Command execution.
//!
//! Runs shell commands under the ambient execution context: the working
//! directory and stdio mode are read from the context active at call time.

use std::process::Stdio;

use tokio::process::Command;

use super::context::{self, ExecOptions, StdioMode};
use crate::error::{RebundleError, Result};

/// Result of a finished command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Captured stdout (empty when stdio is inherited).
    pub stdout: String,
}

/// Run a command with the current context.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned or exits unsuccessfully.
pub async fn exec(command: &str) -> Result<ExecOutput> {
    exec_with(command, ExecOptions::new()).await
}

/// Run a command with `overrides` merged over the current context.
///
/// The command is passed to `sh -c`, so pipes and `&&` chains work as they
/// would in a terminal.
///
/// # Errors
///
/// Returns [`RebundleError::ExternalProcess`] when the command exits with a
/// non-zero status, and an IO error when it cannot be spawned.
pub async fn exec_with(command: &str, overrides: ExecOptions) -> Result<ExecOutput> {
    let ctx = context::current().merged(&overrides);
    let location = ctx
        .cwd()
        .map_or_else(|| ".".to_string(), |cwd| cwd.display().to_string());
    context::log(format_args!("Running in {location}:\n> {command}"));

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    if let Some(cwd) = ctx.cwd() {
        cmd.current_dir(cwd);
    }

    match ctx.stdio.unwrap_or_default() {
        StdioMode::Inherit => {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }
        StdioMode::Piped => {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::inherit());
        }
    }

    let output = cmd
        .output()
        .await
        .map_err(|source| RebundleError::io(format!("execute `{command}` in"), location, source))?;

    if !output.status.success() {
        return Err(RebundleError::ExternalProcess {
            command: command.to_string(),
            code: output.status.code(),
        });
    }

    Ok(ExecOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Quote a single argument for inclusion in a shell command.
pub fn quote(arg: &str) -> String {
    shell_words::quote(arg).into_owned()
}
