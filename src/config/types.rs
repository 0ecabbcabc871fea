//! Configuration type definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Scope used for rebundled package names.
pub const DEFAULT_SCOPE: &str = "@rebundled";

/// Project linked from the readme banner.
pub const DEFAULT_PROJECT_URL: &str = "https://github.com/mmkal/rebundled";

/// General configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Scope prefix for published names.
    #[serde(default)]
    pub scope: Option<String>,
    /// Directory the packages are cloned into.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Print the git diff of each package after bundling.
    #[serde(default)]
    pub show_diff: Option<bool>,
}

/// Readme banner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeConfig {
    /// URL the banner links to.
    #[serde(default)]
    pub project_url: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Readme settings.
    #[serde(default)]
    pub readme: ReadmeConfig,
}

impl Config {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the config file path for the user's home directory.
    pub fn user_config_path() -> Option<PathBuf> {
        crate::utils::global_config_file()
    }

    /// Merge another config into this one (other takes precedence for set values).
    pub fn merge(&mut self, other: Config) {
        if other.general.scope.is_some() {
            self.general.scope = other.general.scope;
        }
        if other.general.scratch_dir.is_some() {
            self.general.scratch_dir = other.general.scratch_dir;
        }
        if other.general.show_diff.is_some() {
            self.general.show_diff = other.general.show_diff;
        }

        if other.readme.project_url.is_some() {
            self.readme.project_url = other.readme.project_url;
        }
    }

    /// Scope prefix for published names.
    pub fn scope(&self) -> &str {
        self.general.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    /// Directory the packages are cloned into.
    ///
    /// Defaults to `rebundled` in the system temp directory.
    pub fn scratch_dir(&self) -> PathBuf {
        self.general
            .scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("rebundled"))
    }

    /// Directory a single package is cloned into.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.scratch_dir().join(Path::new(package))
    }

    /// Whether to print the git diff after bundling.
    pub fn show_diff(&self) -> bool {
        self.general.show_diff.unwrap_or(true)
    }

    /// URL the readme banner links to.
    pub fn project_url(&self) -> &str {
        self.readme
            .project_url
            .as_deref()
            .unwrap_or(DEFAULT_PROJECT_URL)
    }
}
