//! Glob-matched find-and-replace over a project tree.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{RebundleError, Result};

/// One or more glob patterns, relative to the project root.
///
/// Patterns use the syntax of the `glob` crate: `?`, `*`, `**` and `[...]`
/// classes. Brace alternation such as `src/{index,resolver}.ts` is not
/// expanded; list the alternatives as separate patterns instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patterns(Vec<String>);

impl Patterns {
    /// The individual patterns.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns(vec![pattern.to_string()])
    }
}

impl From<String> for Patterns {
    fn from(pattern: String) -> Self {
        Patterns(vec![pattern])
    }
}

impl From<Vec<String>> for Patterns {
    fn from(patterns: Vec<String>) -> Self {
        Patterns(patterns)
    }
}

impl From<&[&str]> for Patterns {
    fn from(patterns: &[&str]) -> Self {
        Patterns(patterns.iter().map(|p| (*p).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Patterns {
    fn from(patterns: [&str; N]) -> Self {
        Patterns(patterns.iter().map(|p| (*p).to_string()).collect())
    }
}

impl fmt::Display for Patterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Glob matching configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobOptions {
    /// Match letter case exactly.
    pub case_sensitive: bool,
    /// Let wildcards match hidden files and directories.
    pub dot: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            dot: false,
        }
    }
}

impl GlobOptions {
    /// Case-insensitive matching.
    pub fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
            ..Self::default()
        }
    }

    fn match_options(self) -> MatchOptions {
        MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: true,
            require_literal_leading_dot: !self.dot,
        }
    }
}

/// Resolve `patterns` to the regular files they match under `root`.
///
/// Results are sorted and de-duplicated.
///
/// # Errors
///
/// Returns an error if a pattern is malformed or a match can't be read.
pub fn resolve(root: &Path, patterns: &Patterns, options: GlobOptions) -> Result<Vec<PathBuf>> {
    let mut matches = BTreeSet::new();

    for pattern in patterns.iter() {
        let full = absolute_pattern(root, pattern, options);
        let paths = glob::glob_with(&full, options.match_options()).map_err(|e| {
            RebundleError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })?;

        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                RebundleError::io("read", path, e.into())
            })?;
            if path.is_file() {
                matches.insert(path);
            }
        }
    }

    Ok(matches.into_iter().collect())
}

fn absolute_pattern(root: &Path, pattern: &str, options: GlobOptions) -> String {
    let fold = |rest: &str| {
        if options.case_sensitive {
            rest.to_string()
        } else {
            fold_case(rest)
        }
    };

    let root = root.to_string_lossy();
    let root = root.trim_end_matches('/');
    if Path::new(pattern).is_absolute() {
        // Fold below the project root, or below `/` for other paths.
        return match pattern.strip_prefix(root).and_then(|rest| rest.strip_prefix('/')) {
            Some(rest) if !root.is_empty() => format!("{}/{}", Pattern::escape(root), fold(rest)),
            _ => format!("/{}", fold(pattern.trim_start_matches('/'))),
        };
    }

    let relative = pattern.strip_prefix("./").unwrap_or(pattern);
    format!("{}/{}", Pattern::escape(root), fold(relative))
}

/// Turn ASCII letters outside character classes into `[xX]` classes.
///
/// glob looks up wildcard-free components directly on disk, which ignores
/// `case_sensitive: false`.
fn fold_case(pattern: &str) -> String {
    let mut folded = String::with_capacity(pattern.len() * 4);
    let mut in_class = false;
    for c in pattern.chars() {
        match c {
            '[' if !in_class => {
                in_class = true;
                folded.push(c);
            }
            ']' if in_class => {
                in_class = false;
                folded.push(c);
            }
            c if !in_class && c.is_ascii_alphabetic() => {
                folded.push('[');
                folded.push(c.to_ascii_lowercase());
                folded.push(c.to_ascii_uppercase());
                folded.push(']');
            }
            c => folded.push(c),
        }
    }
    folded
}

/// Apply `transform` to every file matching `patterns` under `root`.
///
/// Returns the number of files updated.
///
/// # Errors
///
/// Returns [`RebundleError::NoMatches`] if nothing matched.
pub fn update<F>(root: &Path, patterns: &Patterns, options: GlobOptions, mut transform: F) -> Result<usize>
where
    F: FnMut(&str) -> String,
{
    try_update(root, patterns, options, |old| Ok(transform(old)))
}

/// Like [`update`], for transforms that can fail.
///
/// # Errors
///
/// Returns [`RebundleError::NoMatches`] if nothing matched, or the first
/// error returned by `transform`.
pub fn try_update<F>(root: &Path, patterns: &Patterns, options: GlobOptions, mut transform: F) -> Result<usize>
where
    F: FnMut(&str) -> Result<String>,
{
    let matches = resolve(root, patterns, options)?;
    if matches.is_empty() {
        return Err(RebundleError::NoMatches {
            pattern: patterns.to_string(),
        });
    }

    for path in &matches {
        try_update_file(path, &mut transform)?;
    }

    Ok(matches.len())
}

/// Read `path`, transform its whole content and write the result back.
///
/// # Errors
///
/// Returns an error if the file can't be read or written.
pub fn update_file<F>(path: &Path, transform: F) -> Result<()>
where
    F: FnOnce(&str) -> String,
{
    try_update_file(path, |old| Ok(transform(old)))
}

fn try_update_file<F>(path: &Path, transform: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<String>,
{
    let old = std::fs::read_to_string(path).map_err(|e| RebundleError::io("read", path, e))?;
    let updated = transform(&old)?;
    std::fs::write(path, updated).map_err(|e| RebundleError::io("write", path, e))
}
