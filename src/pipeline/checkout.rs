//! Getting a package's source onto disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::stages::RebundleScripts;
use crate::error::{RebundleError, Result};
use crate::package::Manifest;
use crate::runner::{self, exec, quote, run_with_exec_options, ExecOptions};
use crate::utils::single_subdirectory;

/// Provides a fresh checkout of a package's source.
#[async_trait]
pub trait SourceCheckout: Send + Sync {
    /// Produce a checkout of `scripts`' package inside `parent` and return its
    /// root. Anything previously in `parent` may be discarded.
    async fn checkout(&self, scripts: &dyn RebundleScripts, parent: &Path) -> Result<PathBuf>;

    /// Show what changed in the checkout since it was produced.
    async fn report_changes(&self, project: &Path) -> Result<()>;
}

/// Clones the repository of a package installed in the host project.
#[derive(Debug, Clone)]
pub struct GitCheckout {
    host_dir: PathBuf,
}

impl GitCheckout {
    /// Look installed packages up in the project at `host_dir`.
    pub fn new(host_dir: impl Into<PathBuf>) -> Self {
        Self {
            host_dir: host_dir.into(),
        }
    }

    /// The host project's directory.
    pub fn host_dir(&self) -> &Path {
        &self.host_dir
    }

    fn installed(&self, package: &str) -> Result<(Manifest, Option<String>)> {
        let host = Manifest::read(&self.host_dir.join("package.json"))?;
        let installed_version = host.dependency(package).map(str::to_string);
        let installed = Manifest::read(
            &self
                .host_dir
                .join("node_modules")
                .join(package)
                .join("package.json"),
        )?;
        Ok((installed, installed_version))
    }
}

#[async_trait]
impl SourceCheckout for GitCheckout {
    async fn checkout(&self, scripts: &dyn RebundleScripts, parent: &Path) -> Result<PathBuf> {
        let (installed, installed_version) = self.installed(scripts.package())?;
        let repo = scripts.repository(&installed, installed_version.as_deref())?;
        tracing::debug!(url = %repo.url, sha = ?repo.sha, "resolved repository");

        if parent.exists() {
            std::fs::remove_dir_all(parent).map_err(|e| RebundleError::io("remove", parent, e))?;
        }
        std::fs::create_dir_all(parent).map_err(|e| RebundleError::io("create", parent, e))?;

        runner::log(format_args!("Cloning into {}. Git repo: {}", parent.display(), repo.url));
        exec_in(parent, &format!("git clone {}", quote(&repo.url))).await?;
        let project = single_subdirectory(parent)?;

        if let Some(sha) = &repo.sha {
            run_with_exec_options(ExecOptions::new().cwd(&project), async {
                exec("git status").await?;
                exec("git pull origin").await?;
                exec(&format!("git reset --hard {}", quote(sha))).await?;
                Ok::<_, RebundleError>(())
            })
            .await?;
        }

        Ok(project)
    }

    async fn report_changes(&self, project: &Path) -> Result<()> {
        exec_in(project, "git --no-pager diff").await
    }
}

async fn exec_in(cwd: &Path, command: &str) -> Result<()> {
    run_with_exec_options(ExecOptions::new().cwd(cwd), exec(command)).await?;
    Ok(())
}
