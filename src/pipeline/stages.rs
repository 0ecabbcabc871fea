//! The per-package stage interface.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::files::{self, GlobOptions, Patterns};
use crate::package::{default_repository, GitRepo, Manifest};

/// One of the steps a package goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Install,
    Modify,
    Bundle,
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Install => "install",
            Stage::Modify => "modify",
            Stage::Bundle => "bundle",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// What a stage gets to work with.
///
/// Commands run by a stage already execute inside the checkout, so stages
/// only need the paths here for file patching.
pub struct StageContext<'a> {
    /// The manifest being rebundled. Written back before `bundle`.
    pub manifest: &'a mut Manifest,
    /// The manifest as it was checked out.
    pub original: &'a Manifest,
    /// Root of the checkout.
    pub project_path: &'a Path,
    /// Active configuration.
    pub config: &'a Config,
}

impl StageContext<'_> {
    /// Rewrite every project file matching `patterns`.
    ///
    /// # Errors
    ///
    /// Fails if nothing matches or a file can't be rewritten.
    pub fn update<F>(&self, patterns: impl Into<Patterns>, transform: F) -> Result<usize>
    where
        F: FnMut(&str) -> String,
    {
        files::update(self.project_path, &patterns.into(), GlobOptions::default(), transform)
    }

    /// Rewrite matching files with a transform that can fail.
    ///
    /// # Errors
    ///
    /// Fails if nothing matches, a file can't be rewritten or `transform`
    /// fails.
    pub fn try_update<F>(&self, patterns: impl Into<Patterns>, transform: F) -> Result<usize>
    where
        F: FnMut(&str) -> Result<String>,
    {
        files::try_update(self.project_path, &patterns.into(), GlobOptions::default(), transform)
    }

    /// Prepend the rebundled banner and `notes` to the readme, if there is one.
    ///
    /// # Errors
    ///
    /// Fails if the readme exists but can't be rewritten.
    pub fn prepend_readme_note<S: AsRef<str>>(&self, notes: &[S]) -> Result<bool> {
        files::prepend_note(
            self.project_path,
            self.original,
            self.config.project_url(),
            notes,
        )
    }
}

/// The stages of one package.
///
/// Commands run by any stage execute in the checkout with inherited stdio
/// and the package's log prefix.
#[async_trait]
pub trait RebundleScripts: Send + Sync {
    /// Name of the package on npm.
    fn package(&self) -> &str;

    /// Where to clone the package from.
    ///
    /// Defaults to the repository declared by the installed copy.
    ///
    /// # Errors
    ///
    /// Fails when the repository can't be determined.
    fn repository(&self, installed: &Manifest, installed_version: Option<&str>) -> Result<GitRepo> {
        default_repository(installed, installed_version)
    }

    /// Install the package's dependencies.
    async fn install(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()>;

    /// Patch the manifest and sources.
    async fn modify(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()>;

    /// Build the package. The manifest has been written by now.
    async fn bundle(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()>;

    /// Publish the built package.
    async fn publish(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()>;
}
