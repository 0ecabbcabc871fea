//! Rebundling a single package.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::checkout::SourceCheckout;
use super::stages::{RebundleScripts, Stage, StageContext};
use crate::config::Config;
use crate::flags::Flags;
use crate::package::{resolve_version, set_name_and_version, Manifest, Registry};
use crate::runner::{self, run_with_exec_options, ExecOptions, StdioMode};

/// What happened to a rebundled package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebundleOutcome {
    /// Name the package was checked out as.
    pub package: String,
    /// Name it was built (and maybe published) under.
    pub name: String,
    /// Version it was built under.
    pub version: String,
    /// Root of the checkout.
    pub project_path: PathBuf,
    /// Whether `publish` ran.
    pub published: bool,
}

/// Runs packages through checkout, the stages and publish.
pub struct Rebundler {
    flags: Flags,
    config: Config,
    checkout: Arc<dyn SourceCheckout>,
    registry: Arc<dyn Registry>,
}

impl Rebundler {
    /// Create a rebundler.
    pub fn new(
        flags: Flags,
        config: Config,
        checkout: Arc<dyn SourceCheckout>,
        registry: Arc<dyn Registry>,
    ) -> Self {
        Self {
            flags,
            config,
            checkout,
            registry,
        }
    }

    /// Flags for this run.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Configuration for this run.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check out, build and publish one package.
    ///
    /// Everything runs with the package's log prefix and inherited stdio.
    /// Checkout runs in `<scratch_dir>/<package>`, the stages in the checkout.
    ///
    /// # Errors
    ///
    /// Returns the first error from checkout, version resolution or any
    /// stage. Later stages don't run.
    pub async fn rebundle(&self, scripts: &dyn RebundleScripts) -> Result<RebundleOutcome> {
        let package = scripts.package();
        let parent = self.config.package_dir(package);
        let options = ExecOptions::new()
            .prefix([format!("package {package}:")])
            .cwd(&parent)
            .stdio(StdioMode::Inherit);

        run_with_exec_options(options, async {
            let project = self
                .checkout
                .checkout(scripts, &parent)
                .await
                .with_context(|| format!("Failed to check out {package}"))?;

            run_with_exec_options(
                ExecOptions::new().cwd(&project),
                self.run_stages(scripts, &project),
            )
            .await
        })
        .await
    }

    async fn run_stages(&self, scripts: &dyn RebundleScripts, project: &Path) -> Result<RebundleOutcome> {
        let package = scripts.package();
        let manifest_path = project.join("package.json");
        let original = Manifest::read(&manifest_path)?;
        let mut manifest = original.clone();

        let version = resolve_version(original.version(), package, &self.flags, self.registry.as_ref())
            .await
            .with_context(|| format!("Failed to resolve a version for {package}"))?;
        set_name_and_version(&mut manifest, self.config.scope(), &version);

        let mut ctx = StageContext {
            manifest: &mut manifest,
            original: &original,
            project_path: project,
            config: &self.config,
        };

        run_stage(Stage::Modify, package, scripts.modify(&mut ctx)).await?;
        run_stage(Stage::Install, package, scripts.install(&mut ctx)).await?;
        ctx.manifest.write(&manifest_path)?;
        run_stage(Stage::Bundle, package, scripts.bundle(&mut ctx)).await?;

        if self.config.show_diff() {
            self.checkout.report_changes(project).await?;
        }
        runner::log(format_args!("Explore the generated package at {}", project.display()));

        // Stages may change the name or version after resolution.
        let name = ctx.manifest.name().unwrap_or(package).to_string();
        let version = ctx.manifest.version().map_or(version, String::from);
        let published = if self.flags.dry_run {
            runner::log(format_args!("Dry run: skipping publish {name}@{version}"));
            false
        } else {
            runner::log(format_args!("running publish {name}@{version}"));
            scripts
                .publish(&mut ctx)
                .await
                .with_context(|| format!("{} failed for {package}", Stage::Publish))?;
            true
        };

        Ok(RebundleOutcome {
            package: package.to_string(),
            name,
            version,
            project_path: project.to_path_buf(),
            published,
        })
    }
}

async fn run_stage<F>(stage: Stage, package: &str, stage_future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    runner::log(format_args!("running {stage}"));
    stage_future
        .await
        .with_context(|| format!("{stage} failed for {package}"))
}
