//! The package.json document.
//!
//! Keys keep their original order (serde_json's `preserve_order`) and the
//! indentation of the source file is reused when writing it back.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{RebundleError, Result};

/// A parsed package.json that can be written back in its original style.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
    indent: String,
}

impl Manifest {
    /// Parse manifest content.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a JSON object.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let value: Value = serde_json::from_str(content).map_err(|e| format_json_error(content, &e))?;
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                indent: detect_indent(content),
            }),
            other => Err(format!("expected an object, got {}", json_type(&other))),
        }
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RebundleError::io("read", path, e))?;
        Self::parse(&content).map_err(|message| RebundleError::InvalidManifest {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Serialize and write the manifest to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_pretty_string()).map_err(|e| RebundleError::io("write", path, e))
    }

    /// Create a manifest from fields, using two-space indentation.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    /// The package name, if set.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// The package version, if set.
    pub fn version(&self) -> Option<&str> {
        self.get_str("version")
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Check whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field. New keys are appended; existing keys keep their position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field without disturbing the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.fields.get(key).cloned()?;
        self.fields = std::mem::take(&mut self.fields)
            .into_iter()
            .filter(|(k, _)| k != key)
            .collect();
        Some(removed)
    }

    /// Iterate over the keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The version range of a dependency, looked up in `dependencies`.
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.fields
            .get("dependencies")
            .and_then(|deps| deps.get(name))
            .and_then(Value::as_str)
    }

    /// Reorder the fields by a stable sort on `rank`.
    pub fn reorder_by<F>(&mut self, mut rank: F)
    where
        F: FnMut(&str, usize) -> i64,
    {
        let mut entries: Vec<(i64, String, Value)> = std::mem::take(&mut self.fields)
            .into_iter()
            .enumerate()
            .map(|(index, (key, value))| (rank(&key, index), key, value))
            .collect();
        entries.sort_by_key(|(rank, _, _)| *rank);
        self.fields = entries.into_iter().map(|(_, key, value)| (key, value)).collect();
    }

    /// The indentation used when serializing.
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// The fields as a JSON map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize with the detected indentation and a trailing newline.
    pub fn to_pretty_string(&self) -> String {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        // Serializing a map of JSON values into memory cannot fail.
        if self.fields.serialize(&mut serializer).is_err() {
            return format!("{}\n", Value::Object(self.fields.clone()));
        }
        let mut out = String::from_utf8_lossy(&buf).into_owned();
        out.push('\n');
        out
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            self.name().unwrap_or("unnamed"),
            self.version().unwrap_or("0.0.0")
        )
    }
}

const DEFAULT_INDENT: &str = "  ";

/// Detect the indentation of a JSON document.
///
/// Takes the first run of whitespace and drops its leading line break, so
/// `{\n\t"name"` yields a tab. Falls back to two spaces.
pub fn detect_indent(content: &str) -> String {
    let Some(start) = content.find(char::is_whitespace) else {
        return DEFAULT_INDENT.to_string();
    };
    let run: String = content[start..]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    let indent = run.trim_start_matches(['\r', '\n']);
    if indent.is_empty() {
        DEFAULT_INDENT.to_string()
    } else {
        indent.to_string()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Format a JSON parsing error with context.
fn format_json_error(content: &str, error: &serde_json::Error) -> String {
    let line = error.line();
    let column = error.column();

    if let Some(error_line) = content.lines().nth(line.saturating_sub(1)) {
        let pointer = " ".repeat(column.saturating_sub(1)) + "^";
        format!(
            "{}\n  at line {}, column {}:\n    {}\n    {}",
            error, line, column, error_line, pointer
        )
    } else {
        format!("{} at line {}, column {}", error, line, column)
    }
}
