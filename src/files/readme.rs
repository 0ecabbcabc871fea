//! Provenance banner for rebundled readmes.

use std::path::{Path, PathBuf};

use super::patcher::{resolve, update_file, GlobOptions, Patterns};
use crate::error::Result;
use crate::package::Manifest;

/// Find the project's readme, ignoring case.
///
/// Prefers `readme.md`, then any other `readme*` file.
pub fn find_readme(project: &Path) -> Option<PathBuf> {
    ["readme.md", "readme*"].iter().find_map(|pattern| {
        resolve(project, &Patterns::from(*pattern), GlobOptions::case_insensitive())
            .ok()
            .and_then(|matches| matches.into_iter().next())
    })
}

/// The banner placed at the top of a rebundled readme.
pub fn rebundled_note(original: &Manifest, project_url: &str) -> String {
    format!(
        "⚠️⚠️ **This is a [rebundled]({project_url}) version of {}**! ⚠️⚠️",
        original.name().unwrap_or("this package")
    )
}

/// Join the banner, any extra notes and the old content with blank lines.
pub fn compose_readme<S: AsRef<str>>(banner: &str, notes: &[S], old: &str) -> String {
    let mut sections = Vec::with_capacity(notes.len() + 2);
    sections.push(banner);
    sections.extend(notes.iter().map(|note| note.as_ref()));
    sections.push(old);
    sections.join("\n\n")
}

/// Prepend the banner and `notes` to the project's readme.
///
/// Returns `false` without touching anything when there is no readme.
///
/// # Errors
///
/// Returns an error if the readme can't be read or written.
pub fn prepend_note<S: AsRef<str>>(
    project: &Path,
    original: &Manifest,
    project_url: &str,
    notes: &[S],
) -> Result<bool> {
    let Some(readme) = find_readme(project) else {
        return Ok(false);
    };
    let banner = rebundled_note(original, project_url);
    update_file(&readme, |old| compose_readme(&banner, notes, old))?;
    Ok(true)
}
