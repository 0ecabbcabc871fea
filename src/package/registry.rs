//! Published-version lookups against the npm registry.

use async_trait::async_trait;

use crate::error::{RebundleError, Result};
use crate::runner::{exec_with, quote, ExecOptions, StdioMode};

/// Source of the versions already published for a package.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Raw JSON listing the published versions of `package`.
    ///
    /// Usually an array of strings, but a package with a single published
    /// version comes back as a bare string.
    async fn versions_json(&self, package: &str) -> Result<String>;
}

/// Registry lookups through `npm view`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmRegistry;

#[async_trait]
impl Registry for NpmRegistry {
    async fn versions_json(&self, package: &str) -> Result<String> {
        let command = format!("npm view {} versions --json", quote(package));
        let output = exec_with(&command, ExecOptions::new().stdio(StdioMode::Piped)).await?;
        Ok(output.stdout)
    }
}

/// Parse a versions response, wrapping a bare scalar into a list.
///
/// # Errors
///
/// Returns [`RebundleError::InvalidVersion`] if the response is not a JSON
/// string or array of strings.
pub fn parse_versions(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    let json = if trimmed.starts_with('[') {
        trimmed.to_string()
    } else {
        format!("[{trimmed}]")
    };

    serde_json::from_str(&json).map_err(|e| {
        RebundleError::invalid_version(format!("couldn't parse published versions {trimmed:?}: {e}"))
    })
}
