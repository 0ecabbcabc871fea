//! Locating the source repository of an installed package.

use serde_json::Value;

use super::manifest::Manifest;
use crate::error::{RebundleError, Result};

const GITHUB: &str = "https://github.com/";

/// A git repository to clone, optionally pinned to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepo {
    /// Clone URL.
    pub url: String,
    /// Commit to reset to after cloning.
    pub sha: Option<String>,
}

/// Locate the repository for an installed package.
///
/// A `github:<owner>/<repo>#<sha>` install spec wins and pins the commit.
/// Otherwise the manifest's `repository` field is used, either as a string
/// or as `{ "url": ... }`.
///
/// # Errors
///
/// Returns [`RebundleError::Configuration`] if there is no repository field
/// or its value isn't a recognized locator.
pub fn default_repository(installed: &Manifest, installed_version: Option<&str>) -> Result<GitRepo> {
    let package = installed.name().unwrap_or("unnamed package");
    let error = |message: String| RebundleError::Configuration {
        package: package.to_string(),
        message,
    };

    if let Some(spec) = installed_version.and_then(|v| v.strip_prefix("github:")) {
        let (repository, sha) = match spec.split_once('#') {
            Some((repository, sha)) => (repository, Some(sha.to_string())),
            None => (spec, None),
        };
        let url = normalize_url(repository)
            .ok_or_else(|| error(format!("unrecognized install spec github:{spec}")))?;
        return Ok(GitRepo { url, sha });
    }

    let repository = match installed.get("repository") {
        Some(Value::String(repository)) => repository.as_str(),
        Some(Value::Object(fields)) => fields
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| error("repository field has no url".to_string()))?,
        Some(_) => return Err(error("repository field is neither a string nor an object".to_string())),
        None => {
            return Err(error(format!(
                "no repository field, version: {}",
                installed_version.unwrap_or("unknown")
            )))
        }
    };

    let url = normalize_url(repository)
        .ok_or_else(|| error(format!("unrecognized repository locator '{repository}'")))?;
    Ok(GitRepo { url, sha: None })
}

/// Turn a repository locator into a clone URL.
///
/// ```
/// use rebundle::package::normalize_url;
///
/// assert_eq!(normalize_url("sindresorhus/p-memoize").as_deref(), Some("https://github.com/sindresorhus/p-memoize"));
/// assert_eq!(normalize_url("git+https://github.com/a/b.git").as_deref(), Some("https://github.com/a/b.git"));
/// assert_eq!(normalize_url("not a repo"), None);
/// ```
pub fn normalize_url(locator: &str) -> Option<String> {
    let locator = locator.trim();
    let locator = locator.strip_prefix("git+").unwrap_or(locator);

    if ["https://", "http://", "git://", "ssh://", "git@"]
        .iter()
        .any(|scheme| locator.starts_with(scheme))
    {
        return Some(locator.to_string());
    }

    let (host, path) = match locator.split_once(':') {
        Some(("github", path)) => (GITHUB, path),
        Some(("gitlab", path)) => ("https://gitlab.com/", path),
        Some(("bitbucket", path)) => ("https://bitbucket.org/", path),
        Some(_) => return None,
        None => (GITHUB, locator),
    };

    let mut segments = path.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(repo), None) if is_segment(owner) && is_segment(repo) => {
            Some(format!("{host}{owner}/{repo}"))
        }
        _ => None,
    }
}

fn is_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
