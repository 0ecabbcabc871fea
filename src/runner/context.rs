//! Ambient execution context.
//!
//! The working directory, stdio mode and log prefix of the current operation
//! live in a tokio task-local. Activating a scope makes the merged context
//! visible to everything the wrapped future awaits, across suspension points
//! and worker threads, and restores the enclosing context when it completes.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

tokio::task_local! {
    static CONTEXT: ExecContext;
}

/// How spawned commands connect to the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdioMode {
    /// Capture stdout; stderr goes to the terminal.
    #[default]
    Piped,
    /// Inherit stdin, stdout and stderr.
    Inherit,
}

/// The context active for the current task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecContext {
    /// Working directory for spawned commands.
    pub cwd: Option<PathBuf>,
    /// Stdio mode for spawned commands.
    pub stdio: Option<StdioMode>,
    /// Tokens printed in front of every log line.
    pub prefix: Vec<String>,
}

/// Overrides applied on top of the enclosing context.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    cwd: Option<PathBuf>,
    stdio: Option<StdioMode>,
    prefix: Option<Vec<String>>,
}

impl ExecOptions {
    /// Create an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Override the stdio mode.
    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = Some(stdio);
        self
    }

    /// Replace the log prefix.
    pub fn prefix<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix = Some(tokens.into_iter().map(Into::into).collect());
        self
    }
}

impl ExecContext {
    /// Shallow-merge `options` over this context.
    pub fn merged(&self, options: &ExecOptions) -> ExecContext {
        ExecContext {
            cwd: options.cwd.clone().or_else(|| self.cwd.clone()),
            stdio: options.stdio.or(self.stdio),
            prefix: options
                .prefix
                .clone()
                .unwrap_or_else(|| self.prefix.clone()),
        }
    }

    /// The working directory, if one is set.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The log prefix joined with spaces.
    pub fn prefix_string(&self) -> String {
        self.prefix.join(" ")
    }
}

/// Get a copy of the currently active context.
///
/// Outside of any scope this is the default (empty) context.
pub fn current() -> ExecContext {
    CONTEXT.try_with(Clone::clone).unwrap_or_default()
}

/// Run `future` with `options` merged over the current context.
///
/// The previous context is restored once the future completes, whatever
/// it returns.
pub async fn run_with_exec_options<F>(options: ExecOptions, future: F) -> F::Output
where
    F: Future,
{
    let merged = current().merged(&options);
    CONTEXT.scope(merged, future).await
}

/// Log a message with the active prefix.
pub fn log(message: impl fmt::Display) {
    let prefix = CONTEXT
        .try_with(ExecContext::prefix_string)
        .unwrap_or_default();
    if prefix.is_empty() {
        tracing::info!("{message}");
    } else {
        tracing::info!("{prefix} {message}");
    }
}
