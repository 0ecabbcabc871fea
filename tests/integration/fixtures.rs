//! Test fixtures for integration tests.
//!
//! Provides helpers for creating host projects, fake checkouts and
//! registries, stage implementations that record what they were asked to do,
//! and a subscriber that captures log output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use rebundle::config::Config;
use rebundle::error::{RebundleError, Result};
use rebundle::flags::Flags;
use rebundle::package::{prepare_for_microbundle, Manifest, MicrobundleOptions, Registry};
use rebundle::pipeline::{RebundleScripts, Rebundler, SourceCheckout, Stage, StageContext};
use rebundle::runner;

/// Directory name the fake checkout clones into.
pub const REPO_DIR: &str = "repo";

/// A scratch directory plus config pointing at it.
pub struct Workspace {
    _dir: TempDir,
    pub config: Config,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = Config::default();
        config.general.scratch_dir = Some(dir.path().join("scratch"));
        Self { _dir: dir, config }
    }

    /// Where the fake checkout of `package` ends up.
    pub fn project_path(&self, package: &str) -> PathBuf {
        self.config.package_dir(package).join(REPO_DIR)
    }
}

/// The manifest the fake checkout writes for `package`.
pub fn source_manifest(package: &str) -> String {
    format!(
        r#"{{
  "name": "{package}",
  "version": "1.0.0",
  "description": "A package",
  "main": "index.js",
  "typings": "index.d.ts",
  "license": "MIT"
}}
"#
    )
}

/// Writes a canned source tree instead of cloning.
#[derive(Default)]
pub struct FixtureCheckout {
    files: Vec<(String, String)>,
    pub checkouts: AtomicUsize,
    pub diffs: AtomicUsize,
}

impl FixtureCheckout {
    /// Add a file to every checkout.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }
}

#[async_trait]
impl SourceCheckout for FixtureCheckout {
    async fn checkout(&self, scripts: &dyn RebundleScripts, parent: &Path) -> Result<PathBuf> {
        self.checkouts.fetch_add(1, Ordering::SeqCst);

        let project = parent.join(REPO_DIR);
        if parent.exists() {
            fs::remove_dir_all(parent)?;
        }
        fs::create_dir_all(&project)?;
        fs::write(project.join("package.json"), source_manifest(scripts.package()))?;
        for (path, content) in &self.files {
            let path = project.join(path);
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, content)?;
        }
        Ok(project)
    }

    async fn report_changes(&self, _project: &Path) -> Result<()> {
        self.diffs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Answers version lookups with a fixed response.
pub struct FakeRegistry {
    response: String,
    pub queried: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            queried: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn versions_json(&self, package: &str) -> Result<String> {
        self.queried.lock().unwrap().push(package.to_string());
        Ok(self.response.clone())
    }
}

/// What a recording stage saw when it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCall {
    pub stage: String,
    pub cwd: Option<PathBuf>,
    pub prefix: Vec<String>,
    /// package.json as it was on disk when the stage started.
    pub manifest_on_disk: String,
}

/// Stages that only record their calls.
///
/// `modify` applies the usual microbundle transform and readme banner so the
/// written manifest looks like a real one.
pub struct RecordingScripts {
    name: String,
    fail_on: Option<Stage>,
    modified_version: Option<String>,
    pub calls: Mutex<Vec<StageCall>>,
}

impl RecordingScripts {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_on: None,
            modified_version: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail with a command error when `stage` runs.
    pub fn failing_on(mut self, stage: Stage) -> Self {
        self.fail_on = Some(stage);
        self
    }

    /// Set the manifest version to `version` during `modify`.
    pub fn modifying_version(mut self, version: &str) -> Self {
        self.modified_version = Some(version.to_string());
        self
    }

    /// Names of the stages that ran, in order.
    pub fn stages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.stage.clone())
            .collect()
    }

    /// The recorded call for `stage`.
    pub fn call(&self, stage: Stage) -> Option<StageCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|call| call.stage == stage.to_string())
            .cloned()
    }

    fn record(&self, stage: Stage, ctx: &StageContext<'_>) -> anyhow::Result<()> {
        let context = runner::current();
        self.calls.lock().unwrap().push(StageCall {
            stage: stage.to_string(),
            cwd: context.cwd.clone(),
            prefix: context.prefix.clone(),
            manifest_on_disk: fs::read_to_string(ctx.project_path.join("package.json"))?,
        });

        if self.fail_on == Some(stage) {
            return Err(RebundleError::ExternalProcess {
                command: format!("fake {stage}"),
                code: Some(1),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl RebundleScripts for RecordingScripts {
    fn package(&self) -> &str {
        &self.name
    }

    async fn install(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        self.record(Stage::Install, ctx)
    }

    async fn modify(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        self.record(Stage::Modify, ctx)?;
        prepare_for_microbundle(ctx.manifest, &MicrobundleOptions::new("./src/main.js"))?;
        ctx.prepend_readme_note::<&str>(&[])?;
        if let Some(version) = &self.modified_version {
            ctx.manifest.set("version", version.as_str());
        }
        Ok(())
    }

    async fn bundle(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        self.record(Stage::Bundle, ctx)
    }

    async fn publish(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        self.record(Stage::Publish, ctx)
    }
}

/// Build a rebundler over the given fakes.
pub fn rebundler(
    flags: Flags,
    workspace: &Workspace,
    checkout: Arc<FixtureCheckout>,
    registry: Arc<FakeRegistry>,
) -> Rebundler {
    Rebundler::new(flags, workspace.config.clone(), checkout, registry)
}

/// Flags for an explicit version.
pub fn versioned_flags(version: &str) -> Flags {
    let mut flags = Flags::default();
    flags.version = Some(version.to_string());
    flags
}

/// Shared buffer that log output is written into.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture logs on the current thread until the guard is dropped.
///
/// Only works with the current-thread runtime of `#[tokio::test]`.
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (tracing::subscriber::set_default(subscriber), buffer)
}

/// Create a host project with a package.json and nothing installed.
pub fn create_host_project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "host", "dependencies": {"p-memoize": "7.1.1"}}"#,
    )
    .expect("Failed to write package.json");
    dir
}
