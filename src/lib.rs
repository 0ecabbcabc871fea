//! rebundle - re-bundle npm packages under a new scope
//!
//! Clones the source of npm packages installed in a host project, rewrites
//! their `package.json` for microbundle, patches their sources, bundles them
//! and publishes the result under a scope such as `@rebundled`.
//!
//! # Modules
//!
//! - [`catalog`] - The packages rebundle knows how to build
//! - [`cli`] - Command-line interface argument parsing
//! - [`config`] - Configuration file loading and types
//! - [`error`] - Error types and result helpers
//! - [`files`] - Glob-driven file patching and the readme banner
//! - [`flags`] - Run flags
//! - [`logging`] - Subscriber setup
//! - [`package`] - package.json handling, version resolution, repositories
//! - [`pipeline`] - Per-package stages and the batch runner
//! - [`runner`] - Ambient execution context and command execution
//! - [`utils`] - Path utilities
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rebundle::config::Config;
//! use rebundle::flags::Flags;
//! use rebundle::package::NpmRegistry;
//! use rebundle::pipeline::{run_batch, GitCheckout, Rebundler};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut flags = Flags::new("p-memoize".parse()?);
//! flags.dry_run = true;
//!
//! let rebundler = Rebundler::new(
//!     flags,
//!     Config::default(),
//!     Arc::new(GitCheckout::new(".")),
//!     Arc::new(NpmRegistry),
//! );
//! let report = run_batch(&rebundler, &rebundle::catalog::all()).await?;
//! println!("skipped: {:?}", report.skipped);
//! # Ok(())
//! # }
//! ```

/// Built-in package stages.
pub mod catalog;

/// CLI argument definitions.
pub mod cli;

/// Configuration system for loading and merging settings.
pub mod config;

/// Error types and result helpers.
pub mod error;

/// File patching.
pub mod files;

/// Run flags.
pub mod flags;

/// Logging setup.
pub mod logging;

/// package.json handling.
pub mod package;

/// Checkout, stages and batches.
pub mod pipeline;

/// Execution context and commands.
pub mod runner;

/// Path utilities.
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Config;
pub use error::{RebundleError, Result};
pub use flags::{Flags, Include};
pub use pipeline::{run_batch, RebundleScripts, Rebundler};
