//! Integration tests for running a batch of packages.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rebundle::flags::Include;
use rebundle::pipeline::{run_batch, RebundleScripts, Stage};

use crate::fixtures::{
    capture_logs, rebundler, versioned_flags, FakeRegistry, FixtureCheckout, RecordingScripts,
    Workspace,
};

#[tokio::test]
async fn test_include_filter_skips_others() {
    let (_guard, logs) = capture_logs();
    let workspace = Workspace::new();
    let pkg_a = RecordingScripts::new("pkg-a");
    let pkg_b = RecordingScripts::new("pkg-b");
    let mut flags = versioned_flags("9.9.9");
    flags.include = "pkg-a".parse().unwrap();
    let checkout = Arc::new(FixtureCheckout::default());
    let rebundler = rebundler(
        flags,
        &workspace,
        Arc::clone(&checkout),
        Arc::new(FakeRegistry::new("[]")),
    );

    let packages: [&dyn RebundleScripts; 2] = [&pkg_a, &pkg_b];
    let report = run_batch(&rebundler, &packages).await.unwrap();

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].package, "pkg-a");
    assert_eq!(report.skipped, ["pkg-b"]);
    assert!(pkg_b.stages().is_empty());
    assert_eq!(checkout.checkouts.load(Ordering::SeqCst), 1);

    assert!(logs
        .contents()
        .contains("Skipping pkg-b, not specified via --include"));
}

#[tokio::test]
async fn test_all_packages_in_order() {
    let workspace = Workspace::new();
    let pkg_a = RecordingScripts::new("pkg-a");
    let pkg_b = RecordingScripts::new("pkg-b");
    let mut flags = versioned_flags("9.9.9");
    flags.include = Include::All;
    let rebundler = rebundler(
        flags,
        &workspace,
        Arc::new(FixtureCheckout::default()),
        Arc::new(FakeRegistry::new("[]")),
    );

    let packages: [&dyn RebundleScripts; 2] = [&pkg_a, &pkg_b];
    let report = run_batch(&rebundler, &packages).await.unwrap();

    let processed: Vec<&str> = report
        .processed
        .iter()
        .map(|outcome| outcome.name.as_str())
        .collect();
    assert_eq!(processed, ["@rebundled/pkg-a", "@rebundled/pkg-b"]);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn test_failure_stops_batch() {
    let workspace = Workspace::new();
    let pkg_a = RecordingScripts::new("pkg-a").failing_on(Stage::Bundle);
    let pkg_b = RecordingScripts::new("pkg-b");
    let rebundler = rebundler(
        versioned_flags("9.9.9"),
        &workspace,
        Arc::new(FixtureCheckout::default()),
        Arc::new(FakeRegistry::new("[]")),
    );

    let packages: [&dyn RebundleScripts; 2] = [&pkg_a, &pkg_b];
    let err = run_batch(&rebundler, &packages).await.unwrap_err();

    assert!(format!("{err:#}").contains("bundle failed for pkg-a"));
    assert_eq!(pkg_a.stages(), ["modify", "install", "bundle"]);
    assert!(pkg_b.stages().is_empty());
}

#[tokio::test]
async fn test_nothing_included() {
    let workspace = Workspace::new();
    let pkg_a = RecordingScripts::new("pkg-a");
    let mut flags = versioned_flags("9.9.9");
    flags.include = "something-else".parse().unwrap();
    let rebundler = rebundler(
        flags,
        &workspace,
        Arc::new(FixtureCheckout::default()),
        Arc::new(FakeRegistry::new("[]")),
    );

    let packages: [&dyn RebundleScripts; 1] = [&pkg_a];
    let report = run_batch(&rebundler, &packages).await.unwrap();

    assert!(report.processed.is_empty());
    assert_eq!(report.skipped, ["pkg-a"]);
}
