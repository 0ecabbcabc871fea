//! CLI argument definitions for rebundle.
//!
//! Uses clap with derive macros for argument parsing.
//!
//! # Example
//!
//! ```no_run
//! use rebundle::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! println!("Host dir: {:?}", cli.host_dir());
//! ```

use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, Shell};

use crate::flags::{Flags, Include};

/// Re-bundle npm packages with microbundle and republish them under a scope.
///
/// `--version` sets the version to publish; there is no flag printing the
/// version of rebundle itself.
#[derive(Parser, Debug)]
#[command(name = "rebundle")]
#[command(author, about, long_about = None)]
pub struct Cli {
    /// Comma-separated packages to process, or `*` for all of them
    #[arg(long, value_name = "PACKAGES", required_unless_present_any = ["completions", "example_config"])]
    pub include: Option<Include>,

    /// Version to publish
    #[arg(long, value_name = "SEMVER")]
    pub version: Option<String>,

    /// Bump to the next prerelease with this identifier
    #[arg(long, value_name = "TAG")]
    pub prerelease: Option<String>,

    /// Bump from the highest published version
    #[arg(long)]
    pub bump: bool,

    /// Append a timestamp to the version
    #[arg(long)]
    pub timestamp: bool,

    /// Do everything except publish
    #[arg(short, long)]
    pub dry_run: bool,

    /// Path to config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    pub no_config: bool,

    /// Directory to clone packages into
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Project the packages are installed in (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub host_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print an example config file and exit
    #[arg(long)]
    pub example_config: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<CliShell>,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    Powershell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the host project directory.
    ///
    /// Returns the provided path or the current directory.
    pub fn host_dir(&self) -> PathBuf {
        self.host_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// The run flags selected on the command line.
    pub fn flags(&self) -> Flags {
        Flags {
            include: self.include.clone().unwrap_or(Include::Only(Vec::new())),
            version: self.version.clone(),
            prerelease: self.prerelease.clone(),
            bump: self.bump,
            timestamp: self.timestamp,
            dry_run: self.dry_run,
        }
    }

    /// Generate shell completions and write to stdout.
    pub fn generate_completions(shell: CliShell) {
        let mut cmd = Cli::command();
        let shell = match shell {
            CliShell::Bash => Shell::Bash,
            CliShell::Zsh => Shell::Zsh,
            CliShell::Fish => Shell::Fish,
            CliShell::Powershell => Shell::PowerShell,
            CliShell::Elvish => Shell::Elvish,
        };
        generate(shell, &mut cmd, "rebundle", &mut std::io::stdout());
    }
}
