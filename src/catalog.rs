//! The packages rebundle knows how to build.
//!
//! Each package clones from the repository its installed copy declares and
//! publishes with `npm publish --access=public`.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::error::{RebundleError, Result};
use crate::flags::Include;
use crate::package::{prepare_for_microbundle, scoped_name, MicrobundleOptions};
use crate::pipeline::{RebundleScripts, StageContext};
use crate::runner::exec;

const PUBLISH: &str = "npm publish --access=public";

const REF_PARSER: &str = "@bcherny/json-schema-ref-parser";

/// A package with built-in stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownPackage {
    TruncateJson,
    PMemoize,
    JsonSchemaToTypescript,
}

/// Every known package, in the order they are processed.
pub static PACKAGES: [KnownPackage; 3] = [
    KnownPackage::TruncateJson,
    KnownPackage::PMemoize,
    KnownPackage::JsonSchemaToTypescript,
];

/// The known packages as stage implementations.
pub fn all() -> Vec<&'static dyn RebundleScripts> {
    PACKAGES
        .iter()
        .map(|package| package as &dyn RebundleScripts)
        .collect()
}

/// Names passed to `--include` that no known package has.
pub fn unknown_names(include: &Include) -> Vec<&str> {
    match include {
        Include::All => Vec::new(),
        Include::Only(names) => names
            .iter()
            .map(String::as_str)
            .filter(|name| KnownPackage::from_name(name).is_none())
            .collect(),
    }
}

impl KnownPackage {
    /// Look a package up by its npm name.
    pub fn from_name(name: &str) -> Option<Self> {
        PACKAGES.iter().copied().find(|package| package.name() == name)
    }

    /// The npm name.
    pub fn name(self) -> &'static str {
        match self {
            KnownPackage::TruncateJson => "truncate-json",
            KnownPackage::PMemoize => "p-memoize",
            KnownPackage::JsonSchemaToTypescript => "json-schema-to-typescript",
        }
    }

    fn install_command(self) -> &'static str {
        match self {
            KnownPackage::TruncateJson => "npm install --ignore-scripts --production",
            KnownPackage::PMemoize | KnownPackage::JsonSchemaToTypescript => {
                "npm install --ignore-scripts"
            }
        }
    }

    fn bundle_command(self) -> &'static str {
        match self {
            KnownPackage::TruncateJson => {
                "microbundle --target node --generateTypes false --external none"
            }
            KnownPackage::PMemoize => "microbundle --target node --generateTypes true --external none",
            KnownPackage::JsonSchemaToTypescript => {
                "microbundle --target web --external none --compress false --generateTypes false && tsc --emitDeclarationOnly"
            }
        }
    }

    fn microbundle_options(self) -> MicrobundleOptions {
        match self {
            KnownPackage::TruncateJson => MicrobundleOptions::new("./src/main.js"),
            KnownPackage::PMemoize => MicrobundleOptions::new("./index.ts").types("./dist/index.d.ts"),
            KnownPackage::JsonSchemaToTypescript => MicrobundleOptions::new("./src/index.ts"),
        }
    }
}

#[async_trait]
impl RebundleScripts for KnownPackage {
    fn package(&self) -> &str {
        self.name()
    }

    async fn install(&self, _ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        exec(self.install_command()).await?;
        Ok(())
    }

    async fn modify(&self, ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        prepare_for_microbundle(ctx.manifest, &self.microbundle_options())?;

        match self {
            KnownPackage::TruncateJson => {
                prepend_banner::<&str>(ctx, &[])?;
            }
            KnownPackage::PMemoize => {
                // Lifecycle scripts would run again on publish.
                ctx.manifest.set("scripts", Value::Object(Default::default()));
                ctx.update("./index.ts", named_default_export)?;
                prepend_banner(ctx, &[p_memoize_note(ctx.config.scope())])?;
            }
            KnownPackage::JsonSchemaToTypescript => {
                ctx.update("./src/index.ts", lazy_fs_import)?;
                ctx.try_update("./src/resolver.ts", typed_ref_parser_require)?;
                ctx.try_update("./tsconfig.json", emit_declarations)?;
            }
        }
        Ok(())
    }

    async fn bundle(&self, _ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        exec(self.bundle_command()).await?;
        Ok(())
    }

    async fn publish(&self, _ctx: &mut StageContext<'_>) -> anyhow::Result<()> {
        exec(PUBLISH).await?;
        Ok(())
    }
}

fn prepend_banner<S: AsRef<str>>(ctx: &StageContext<'_>, notes: &[S]) -> Result<()> {
    if !ctx.prepend_readme_note(notes)? {
        tracing::warn!("{} has no readme, skipping the rebundled note", ctx.project_path.display());
    }
    Ok(())
}

fn p_memoize_note(scope: &str) -> String {
    format!(
        "**Note**: the default import has been replaced with a named import, so you must use `import {{pMemoize}} from '{}'` instead of `import pMemoize from 'p-memoize'`.",
        scoped_name(scope, "p-memoize")
    )
}

/// `p-memoize` exports its function as default; bundled it has to be named.
fn named_default_export(source: &str) -> String {
    source.replacen("export default function pMemoize", "export function pMemoize", 1)
}

/// Load `fs` through `eval` so frontend bundlers don't try to resolve it.
fn lazy_fs_import(source: &str) -> String {
    let replacement = [
        "const {readFileSync} = {",
        "  // use eval so frontend bundlers can use (most of) this library without failing to load 'fs'",
        "  readFileSync: (filepath: string) => (eval(\"require('fs')\") as typeof import('fs')).readFileSync(filepath),",
        "}",
    ]
    .join("\n");
    source.replacen("import {readFileSync} from 'fs'", &replacement, 1)
}

/// Replace the `import = require` of the ref parser with a typed `require`.
///
/// Types from the import are then referenced through `import(...)`.
fn typed_ref_parser_require(source: &str) -> Result<String> {
    let pattern = r"\$RefParser.(\w+)";
    let type_reference = Regex::new(pattern).map_err(|e| RebundleError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let required = source.replacen(
        &format!("import $RefParser = require('{REF_PARSER}')"),
        &format!("const $RefParser = require('{REF_PARSER}') as typeof import('{REF_PARSER}')"),
        1,
    );
    Ok(type_reference
        .replace_all(&required, format!("import('{REF_PARSER}').${{1}}").as_str())
        .into_owned())
}

/// Turn on declaration output for `src` in a tsconfig.
fn emit_declarations(tsconfig: &str) -> Result<String> {
    let invalid = |message: String| RebundleError::InvalidManifest {
        path: "tsconfig.json".into(),
        message,
    };

    let mut json: Value = serde_json::from_str(tsconfig).map_err(|e| invalid(e.to_string()))?;
    let root = json
        .as_object_mut()
        .ok_or_else(|| invalid("expected an object".to_string()))?;

    let compiler_options = root
        .entry("compilerOptions")
        .or_insert_with(|| Value::Object(Default::default()));
    match compiler_options.as_object_mut() {
        Some(options) => {
            options.insert("declaration".to_string(), Value::Bool(true));
        }
        None => return Err(invalid("compilerOptions is not an object".to_string())),
    }
    root.insert("include".to_string(), serde_json::json!(["src"]));

    serde_json::to_string_pretty(&json).map_err(|e| invalid(e.to_string()))
}
