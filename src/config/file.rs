//! Configuration file loading and parsing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;
use crate::error::RebundleError;

/// Load configuration from the specified path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).map_err(|e| RebundleError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(config)
}

/// Load configuration with proper priority and merging.
///
/// Searches for config files in order of priority (lowest to highest):
/// 1. `~/.config/rebundle/config.toml` (user-level, lowest priority)
/// 2. `.rebundlerc.toml` in the host directory (project-level)
/// 3. CLI argument `--config <path>` (highest priority)
///
/// Missing config files are handled gracefully (defaults are used).
///
/// # Errors
///
/// Returns an error if a specified config file (via CLI) cannot be read or parsed.
/// Broken default config files are warned about and skipped.
pub fn load_config(cli_config_path: Option<&Path>, host_dir: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(user_config_path) = Config::user_config_path() {
        if user_config_path.exists() {
            match load_config_from_path(&user_config_path) {
                Ok(user_config) => config.merge(user_config),
                Err(e) => tracing::warn!(
                    "Failed to load user config at {}: {e:#}",
                    user_config_path.display()
                ),
            }
        }
    }

    let project_config_path = host_dir.join(".rebundlerc.toml");
    if project_config_path.exists() {
        match load_config_from_path(&project_config_path) {
            Ok(project_config) => config.merge(project_config),
            Err(e) => tracing::warn!(
                "Failed to load project config at {}: {e:#}",
                project_config_path.display()
            ),
        }
    }

    if let Some(cli_path) = cli_config_path {
        let cli_config = load_config_from_path(cli_path).with_context(|| {
            format!(
                "Failed to load config from CLI-specified path: {}",
                cli_path.display()
            )
        })?;
        config.merge(cli_config);
    }

    Ok(config)
}

/// Generate an example configuration file with all options documented.
pub fn generate_example_config() -> String {
    r#"# rebundle Configuration File
# Place this file at ~/.config/rebundle/config.toml for global settings
# or .rebundlerc.toml next to the host package.json for project settings

[general]
# Scope prefix for the republished packages
scope = "@rebundled"

# Where packages are cloned and built
# scratch_dir = "/tmp/rebundled"

# Print `git diff` of each package after bundling
show_diff = true

[readme]
# Link used in the banner prepended to each readme
project_url = "https://github.com/mmkal/rebundled"
"#
    .to_string()
}
