//! Path utilities.

use std::path::{Path, PathBuf};

use crate::error::{RebundleError, Result};

/// Maximum number of parent directories to search.
pub const MAX_SEARCH_DEPTH: usize = 10;

/// Find the package.json file starting from the given directory.
///
/// Searches the given directory and up to 10 parent directories.
///
/// # Errors
///
/// Returns an error if no package.json is found.
pub fn find_package_json(start_dir: &Path) -> Result<PathBuf> {
    let start = start_dir
        .canonicalize()
        .map_err(|e| RebundleError::io("access", start_dir, e))?;

    let mut current = start.as_path();
    let mut depth = 0;

    while depth < MAX_SEARCH_DEPTH {
        let package_json = current.join("package.json");
        if package_json.exists() {
            return Ok(package_json);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent;
                depth += 1;
            }
            _ => break,
        }
    }

    Err(RebundleError::NoHostManifest {
        path: start,
        depth: MAX_SEARCH_DEPTH,
    })
}

/// Find the host project root (directory containing package.json).
///
/// # Errors
///
/// Returns an error if no package.json is found.
pub fn find_project_root(start_dir: &Path) -> Result<PathBuf> {
    let package_json = find_package_json(start_dir)?;
    Ok(package_json
        .parent()
        .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf))
}

/// The only directory inside `parent`.
///
/// # Errors
///
/// Returns an error if `parent` can't be listed or doesn't hold exactly one
/// directory.
pub fn single_subdirectory(parent: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(parent).map_err(|e| RebundleError::io("list", parent, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RebundleError::io("list", parent, e))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }

    match <[PathBuf; 1]>::try_from(dirs) {
        Ok([dir]) => Ok(dir),
        Err(dirs) => Err(RebundleError::UnexpectedCheckout {
            path: parent.to_path_buf(),
            found: dirs.len(),
        }),
    }
}

/// Get the config directory for rebundle.
///
/// Returns `~/.config/rebundle` on Unix-like systems.
fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rebundle"))
}

/// Get the global config file path.
///
/// Returns `~/.config/rebundle/config.toml`.
pub fn global_config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Find local config file in the host project directory.
///
/// Looks for `.rebundlerc.toml` in the given directory.
pub fn local_config_file(project_dir: &Path) -> Option<PathBuf> {
    let config_file = project_dir.join(".rebundlerc.toml");
    if config_file.exists() {
        Some(config_file)
    } else {
        None
    }
}
