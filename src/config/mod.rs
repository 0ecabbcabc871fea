//! Configuration module for rebundle.
//!
//! Handles loading and merging configuration from multiple sources:
//! - CLI arguments (highest priority)
//! - Project-level `.rebundlerc.toml`
//! - User-level `~/.config/rebundle/config.toml`

pub mod file;
mod types;

pub use file::{generate_example_config, load_config};
pub use types::{Config, GeneralConfig, ReadmeConfig, DEFAULT_PROJECT_URL, DEFAULT_SCOPE};
