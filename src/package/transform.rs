//! Manifest transformation for microbundle.
//!
//! The options are explicit values rather than anything inferred from the
//! package, so applying them is a plain overwrite of the listed fields.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::manifest::Manifest;
use crate::error::{RebundleError, Result};

/// Value of the manifest's `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// ES modules.
    #[default]
    Module,
    /// CommonJS.
    CommonJs,
}

impl ModuleType {
    /// The manifest value.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleType::Module => "module",
            ModuleType::CommonJs => "commonjs",
        }
    }
}

/// Conditional exports for `require` and `import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalExports {
    pub require: String,
    pub import: String,
}

/// What to do when the manifest already has an `exports` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportsStrategy {
    /// Fail unless the existing map equals the new one.
    #[default]
    Refuse,
    /// Replace the existing map.
    Overwrite,
}

/// The bundler-relevant manifest fields to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicrobundleOptions {
    /// Source entry point (`source`).
    pub source: String,
    /// Module type (`type`).
    pub module_type: ModuleType,
    /// Export map (`exports`).
    pub exports: ConditionalExports,
    /// CommonJS entry (`main`).
    pub main: String,
    /// ES module entry (`module`).
    pub module: String,
    /// Declared types (`types`).
    pub types: String,
    /// Published files (`files`).
    pub files: Vec<String>,
    /// CDN entry (`unpkg`).
    pub unpkg: Option<String>,
    /// Handling of a pre-existing `exports` field.
    pub exports_strategy: ExportsStrategy,
}

impl MicrobundleOptions {
    /// Microbundle's usual layout for an ES module built from `source`.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            module_type: ModuleType::Module,
            exports: ConditionalExports {
                require: "./dist/main.cjs".to_string(),
                import: "./dist/main.modern.js".to_string(),
            },
            main: "./dist/main.cjs".to_string(),
            module: "./dist/main.module.js".to_string(),
            types: "./src/main.d.ts".to_string(),
            files: vec!["dist".to_string(), "src/main.d.ts".to_string()],
            unpkg: Some("./dist/main.umd.js".to_string()),
            exports_strategy: ExportsStrategy::Refuse,
        }
    }

    /// Use `types` as the declared types entry.
    pub fn types(mut self, types: impl Into<String>) -> Self {
        self.types = types.into();
        self
    }

    /// The fields this transform assigns, in assignment order.
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("source", Value::from(self.source.as_str())),
            ("type", Value::from(self.module_type.as_str())),
            ("exports", self.exports_value()),
            ("main", Value::from(self.main.as_str())),
            ("module", Value::from(self.module.as_str())),
            ("types", Value::from(self.types.as_str())),
            ("files", Value::from(self.files.clone())),
        ];
        if let Some(unpkg) = &self.unpkg {
            fields.push(("unpkg", Value::from(unpkg.as_str())));
        }
        fields
    }

    fn exports_value(&self) -> Value {
        serde_json::json!({
            "require": self.exports.require,
            "import": self.exports.import,
        })
    }
}

/// Rewrite the name into `scope` and assign the resolved version.
pub fn set_name_and_version(manifest: &mut Manifest, scope: &str, version: &str) {
    let name = scoped_name(scope, manifest.name().unwrap_or_default());
    manifest.set("name", name);
    manifest.set("version", version);
}

/// Build the scoped name for a package: `@scope/short-name`.
///
/// ```
/// use rebundle::package::scoped_name;
///
/// assert_eq!(scoped_name("@rebundled", "p-memoize"), "@rebundled/p-memoize");
/// assert_eq!(scoped_name("@rebundled", "@bcherny/json-schema-ref-parser"), "@rebundled/json-schema-ref-parser");
/// ```
pub fn scoped_name(scope: &str, name: &str) -> String {
    let short = name.rsplit('/').next().unwrap_or(name);
    format!("{}/{}", scope.trim_end_matches('/'), short)
}

/// Overwrite the manifest's bundler fields from `options`.
///
/// Afterwards `name` and `version` come first, then keys that did not exist
/// before, then every pre-existing key in its original order. A legacy
/// `typings` field is dropped in favour of `types`.
///
/// # Errors
///
/// Returns [`RebundleError::UnsupportedTransform`] if the manifest already
/// has a different `exports` map and the strategy is
/// [`ExportsStrategy::Refuse`].
pub fn prepare_for_microbundle(manifest: &mut Manifest, options: &MicrobundleOptions) -> Result<()> {
    if let Some(existing) = manifest.get("exports") {
        if options.exports_strategy == ExportsStrategy::Refuse && *existing != options.exports_value() {
            return Err(RebundleError::UnsupportedTransform {
                package: manifest.name().unwrap_or("package").to_string(),
            });
        }
    }

    let assignments = options.assignments();
    let new_keys: HashSet<&str> = assignments
        .iter()
        .map(|(key, _)| *key)
        .filter(|key| !manifest.contains(key))
        .collect();

    manifest.remove("typings");
    for (key, value) in assignments {
        manifest.set(key, value);
    }

    manifest.reorder_by(|key, index| match key {
        "name" => -3,
        "version" => -2,
        key if new_keys.contains(key) => -1,
        _ => index as i64,
    });

    Ok(())
}
