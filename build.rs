//! Build script for rebundle.
//!
//! Generates man pages using clap_mangen.

use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};

/// Minimal CLI struct for man page generation.
///
/// This duplicates the CLI definition to avoid build dependency issues.
#[derive(Parser)]
#[command(name = "rebundle")]
#[command(
    author,
    about = "Re-bundle npm packages with microbundle and republish them under a scope"
)]
#[command(
    long_about = "rebundle clones the source of npm packages installed in a host project, \
    rewrites their package.json for microbundle, patches their sources, bundles them \
    and publishes the result under a new scope.\n\n\
    Choose packages with --include, and a version with --version, --bump, \
    --prerelease or --timestamp. Use --dry-run to stop before publishing."
)]
struct Cli {
    /// Comma-separated packages to process, or `*` for all of them
    #[arg(long, value_name = "PACKAGES", required_unless_present_any = ["completions", "example_config"])]
    include: Option<String>,

    /// Version to publish
    #[arg(long, value_name = "SEMVER")]
    version: Option<String>,

    /// Bump to the next prerelease with this identifier
    #[arg(long, value_name = "TAG")]
    prerelease: Option<String>,

    /// Bump from the highest published version
    #[arg(long)]
    bump: bool,

    /// Append a timestamp to the version
    #[arg(long)]
    timestamp: bool,

    /// Do everything except publish
    #[arg(short, long)]
    dry_run: bool,

    /// Path to config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// Directory to clone packages into
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Project the packages are installed in (default: current directory)
    #[arg(long, value_name = "DIR")]
    host_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Print an example config file and exit
    #[arg(long)]
    example_config: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

fn main() {
    // Only generate man pages for release builds or when explicitly requested
    let profile = env::var("PROFILE").unwrap_or_default();
    if profile != "release" && env::var("REBUNDLE_GEN_MANPAGE").is_err() {
        return;
    }

    let out_dir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return,
    };

    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);

    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to generate man page");

    let man_path = out_dir.join("rebundle.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    // Also copy to docs directory for distribution
    if let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR") {
        let docs_dir = PathBuf::from(manifest_dir).join("docs");
        if docs_dir.exists() {
            let _ = fs::copy(&man_path, docs_dir.join("rebundle.1"));
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
