//! Version resolution for rebundled packages.

use semver::{Prerelease, Version};

use super::registry::{parse_versions, Registry};
use crate::error::{RebundleError, Result};
use crate::flags::Flags;
use crate::runner::log;

/// Resolve the version to publish.
///
/// In order of precedence: an explicit `--version`; `--bump` from the
/// highest version of `package` published on the registry; `--prerelease`
/// applied to `base`; `--timestamp` appended to `base`; `base` itself.
///
/// # Errors
///
/// Returns [`RebundleError::InvalidVersion`] if no version can be determined
/// or the result is not valid semver.
pub async fn resolve_version(
    base: Option<&str>,
    package: &str,
    flags: &Flags,
    registry: &dyn Registry,
) -> Result<String> {
    let version = if let Some(version) = &flags.version {
        Some(version.clone())
    } else if flags.bump {
        let raw = registry.versions_json(package).await?;
        let latest = highest_version(&parse_versions(&raw)?)?;
        log(format_args!("Found published version {latest}"));
        let bumped = if latest.pre.is_empty() {
            increment_patch(&latest)?
        } else {
            increment_prerelease(&latest, None)?
        };
        log(format_args!("Bumped version {bumped}"));
        Some(bumped.to_string())
    } else if let Some(identifier) = &flags.prerelease {
        let version = base
            .map(|base| parse(base).and_then(|v| increment_prerelease(&v, Some(identifier))))
            .transpose()?
            .map(|v| v.to_string());
        if let Some(version) = &version {
            log(format_args!("New prerelease '{identifier}' version: {version}"));
        }
        version
    } else if flags.timestamp {
        let version = base.map(|base| format!("{base}-{}", chrono::Utc::now().timestamp_millis()));
        if let Some(version) = &version {
            log(format_args!("New timestamp version: {version}"));
        }
        version
    } else {
        base.map(String::from)
    };

    let Some(version) = version else {
        return Err(RebundleError::invalid_version(
            "couldn't get a version. Specify one with --version, or use --bump, --timestamp or --prerelease",
        ));
    };
    parse(&version)?;
    Ok(version)
}

fn parse(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|_| RebundleError::invalid_version(format!("invalid version: {version}")))
}

/// The highest of `versions` in semver order.
///
/// # Errors
///
/// Returns an error if the list is empty or contains an invalid version.
pub fn highest_version(versions: &[String]) -> Result<Version> {
    let mut parsed = versions
        .iter()
        .map(|v| parse(v))
        .collect::<Result<Vec<_>>>()?;
    parsed.sort();
    parsed
        .pop()
        .ok_or_else(|| RebundleError::invalid_version("no published versions found"))
}

/// `1.2.3` → `1.2.4`, dropping any prerelease or build metadata.
///
/// # Errors
///
/// Returns [`RebundleError::InvalidVersion`] if the patch number overflows.
pub fn increment_patch(version: &Version) -> Result<Version> {
    let patch = version
        .patch
        .checked_add(1)
        .ok_or_else(|| RebundleError::invalid_version(format!("can't increment {version}")))?;
    Ok(Version::new(version.major, version.minor, patch))
}

/// Increment the prerelease component of `version`.
///
/// A release version first gets a patch bump and starts at `<identifier>.0`
/// (or `0`). Otherwise the last numeric identifier is incremented, or `0`
/// appended when there is none; a different `identifier` restarts at
/// `<identifier>.0`.
///
/// # Errors
///
/// Returns [`RebundleError::InvalidVersion`] if a number overflows `u64`.
pub fn increment_prerelease(version: &Version, identifier: Option<&str>) -> Result<Version> {
    let overflow = || RebundleError::invalid_version(format!("can't increment {version}"));

    let mut next = if version.pre.is_empty() {
        increment_patch(version)?
    } else {
        let mut next = version.clone();
        next.build = semver::BuildMetadata::EMPTY;
        next
    };

    let mut parts: Vec<String> = if next.pre.is_empty() {
        Vec::new()
    } else {
        next.pre.as_str().split('.').map(String::from).collect()
    };

    match parts.iter().rposition(|part| is_numeric(part)) {
        Some(index) => {
            let n = parts[index]
                .parse::<u64>()
                .ok()
                .and_then(|n| n.checked_add(1))
                .ok_or_else(overflow)?;
            parts[index] = n.to_string();
        }
        None => parts.push("0".to_string()),
    }

    if let Some(identifier) = identifier {
        let same_identifier = parts.first().is_some_and(|first| first == identifier);
        let counted = parts.get(1).is_some_and(|second| is_numeric(second));
        if !same_identifier || !counted {
            parts = vec![identifier.to_string(), "0".to_string()];
        }
    }

    next.pre = Prerelease::new(&parts.join(".")).map_err(|e| {
        RebundleError::invalid_version(format!("invalid prerelease for {version}: {e}"))
    })?;
    Ok(next)
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}
