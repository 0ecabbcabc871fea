//! Snapshot tests using insta.
//!
//! These tests capture the manifest a package is bundled with.

use std::fs;
use std::sync::Arc;

use rebundle::package::{prepare_for_microbundle, Manifest, MicrobundleOptions};

use crate::fixtures::{
    rebundler, source_manifest, versioned_flags, FakeRegistry, FixtureCheckout, RecordingScripts,
    Workspace,
};

#[tokio::test]
async fn test_snapshot_written_manifest() {
    let workspace = Workspace::new();
    let scripts = RecordingScripts::new("pkg-a");
    let rebundler = rebundler(
        versioned_flags("9.9.9"),
        &workspace,
        Arc::new(FixtureCheckout::default()),
        Arc::new(FakeRegistry::new("[]")),
    );

    rebundler.rebundle(&scripts).await.unwrap();
    let written = fs::read_to_string(workspace.project_path("pkg-a").join("package.json")).unwrap();

    insta::assert_snapshot!(written.trim_end(), @r###"
    {
      "name": "@rebundled/pkg-a",
      "version": "9.9.9",
      "source": "./src/main.js",
      "type": "module",
      "exports": {
        "require": "./dist/main.cjs",
        "import": "./dist/main.modern.js"
      },
      "module": "./dist/main.module.js",
      "types": "./src/main.d.ts",
      "files": [
        "dist",
        "src/main.d.ts"
      ],
      "unpkg": "./dist/main.umd.js",
      "description": "A package",
      "main": "./dist/main.cjs",
      "license": "MIT"
    }
    "###);
}

#[test]
fn test_snapshot_tab_indented_manifest() {
    let source = source_manifest("p-memoize").replace("  ", "\t");
    let mut manifest = Manifest::parse(&source).unwrap();
    prepare_for_microbundle(
        &mut manifest,
        &MicrobundleOptions::new("./index.ts").types("./dist/index.d.ts"),
    )
    .unwrap();

    insta::assert_snapshot!(manifest.to_pretty_string().trim_end().replace('\t', "<tab>"), @r###"
    {
    <tab>"name": "p-memoize",
    <tab>"version": "1.0.0",
    <tab>"source": "./index.ts",
    <tab>"type": "module",
    <tab>"exports": {
    <tab><tab>"require": "./dist/main.cjs",
    <tab><tab>"import": "./dist/main.modern.js"
    <tab>},
    <tab>"module": "./dist/main.module.js",
    <tab>"types": "./dist/index.d.ts",
    <tab>"files": [
    <tab><tab>"dist",
    <tab><tab>"src/main.d.ts"
    <tab>],
    <tab>"unpkg": "./dist/main.umd.js",
    <tab>"description": "A package",
    <tab>"main": "./dist/main.cjs",
    <tab>"license": "MIT"
    }
    "###);
}
