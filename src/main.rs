//! rebundle - re-bundle npm packages under a new scope
//!
//! Entry point for the rebundle CLI application.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};

use rebundle::catalog;
use rebundle::cli::Cli;
use rebundle::config::{generate_example_config, load_config, Config};
use rebundle::error::{exit_code, RebundleError};
use rebundle::logging::init_logging;
use rebundle::package::NpmRegistry;
use rebundle::pipeline::{run_batch, GitCheckout, Rebundler};
use rebundle::utils::{find_project_root, global_config_file, local_config_file};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Check if it's one of our custom errors with good formatting
            if let Some(rebundle_err) = err.downcast_ref::<RebundleError>() {
                eprintln!("Error: {err:#}");
                return ExitCode::from(rebundle_err.exit_code() as u8);
            }
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code::GENERAL_ERROR as u8)
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse_args();

    // Handle shell completions early
    if let Some(shell) = cli.completions {
        Cli::generate_completions(shell);
        return Ok(exit_code::SUCCESS);
    }

    if cli.example_config {
        print!("{}", generate_example_config());
        return Ok(exit_code::SUCCESS);
    }

    init_logging(cli.debug);
    tracing::debug!(?cli, "parsed arguments");

    let flags = cli.flags();
    for name in catalog::unknown_names(&flags.include) {
        tracing::warn!("Unknown package {name} in --include");
    }

    let host_dir =
        find_project_root(&cli.host_dir()).context("Failed to find host project directory")?;

    if cli.debug {
        print_debug_paths(&host_dir);
    }

    let mut config = if cli.no_config {
        Config::default()
    } else {
        load_config(cli.config.as_deref(), &host_dir)?
    };
    if let Some(scratch_dir) = &cli.scratch_dir {
        config.general.scratch_dir = Some(scratch_dir.clone());
    }
    tracing::debug!(?config, "loaded configuration");

    let rebundler = Rebundler::new(
        flags,
        config,
        Arc::new(GitCheckout::new(&host_dir)),
        Arc::new(NpmRegistry),
    );

    let report = run_batch(&rebundler, &catalog::all()).await?;
    for outcome in &report.processed {
        let action = if outcome.published { "published" } else { "built" };
        tracing::info!("{} {action} as {}@{}", outcome.package, outcome.name, outcome.version);
    }

    Ok(exit_code::SUCCESS)
}

/// Log where configuration is read from.
fn print_debug_paths(host_dir: &Path) {
    match global_config_file() {
        Some(cfg) => tracing::debug!("Global config: {} (exists: {})", cfg.display(), cfg.exists()),
        None => tracing::debug!("Global config: <not available>"),
    }

    match local_config_file(host_dir) {
        Some(cfg) => tracing::debug!("Local config: {} (exists: true)", cfg.display()),
        None => tracing::debug!(
            "Local config: {}/.rebundlerc.toml (exists: false)",
            host_dir.display()
        ),
    }

    let package_json = host_dir.join("package.json");
    tracing::debug!(
        "package.json: {} (exists: {})",
        package_json.display(),
        package_json.exists()
    );
}
