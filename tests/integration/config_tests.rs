//! Integration tests for configuration loading and merging.

use std::fs;
use std::path::PathBuf;

use rebundle::config::{generate_example_config, load_config, Config, GeneralConfig, ReadmeConfig};

use crate::fixtures::create_host_project;

// ==================== Config Defaults ====================

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.scope(), "@rebundled");
    assert!(config.show_diff());
    assert_eq!(config.project_url(), "https://github.com/mmkal/rebundled");
}

#[test]
fn test_config_new() {
    // Should be same as default
    assert_eq!(Config::new(), Config::default());
}

// ==================== Config Merging ====================

#[test]
fn test_config_merge() {
    let mut base = Config::default();
    base.general.scope = Some("@base".to_string());
    base.general.show_diff = Some(false);

    let overlay = Config {
        general: GeneralConfig {
            scope: Some("@overlay".to_string()),
            ..Default::default()
        },
        readme: ReadmeConfig {
            project_url: Some("https://example.com/fork".to_string()),
        },
    };

    base.merge(overlay);

    // Overlay value should win
    assert_eq!(base.scope(), "@overlay");
    assert_eq!(base.project_url(), "https://example.com/fork");
    // Unset overlay values keep the base
    assert!(!base.show_diff());
}

// ==================== Loading ====================

#[test]
fn test_project_config_is_loaded() {
    let host = create_host_project();
    fs::write(
        host.path().join(".rebundlerc.toml"),
        "[general]\nscratch_dir = \"/var/tmp/rebundled\"\n\n[readme]\nproject_url = \"https://example.com\"\n",
    )
    .unwrap();

    let config = load_config(None, host.path()).unwrap();

    assert_eq!(config.scratch_dir(), PathBuf::from("/var/tmp/rebundled"));
    assert_eq!(config.package_dir("p-memoize"), PathBuf::from("/var/tmp/rebundled/p-memoize"));
    assert_eq!(config.project_url(), "https://example.com");
}

#[test]
fn test_cli_config_wins_over_project_config() {
    let host = create_host_project();
    fs::write(host.path().join(".rebundlerc.toml"), "[general]\nscope = \"@project\"\n").unwrap();
    let cli_config = host.path().join("cli.toml");
    fs::write(&cli_config, "[general]\nscope = \"@cli\"\n").unwrap();

    let config = load_config(Some(&cli_config), host.path()).unwrap();
    assert_eq!(config.scope(), "@cli");
}

#[test]
fn test_example_config_loads() {
    let host = create_host_project();
    let path = host.path().join("example.toml");
    fs::write(&path, generate_example_config()).unwrap();

    let config = load_config(Some(&path), host.path()).unwrap();
    assert_eq!(config.scope(), "@rebundled");
    assert!(config.show_diff());
}
