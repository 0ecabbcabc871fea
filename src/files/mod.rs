//! File patching for checked-out projects.
//!
//! Glob-resolved and single-file read/transform/write, plus the readme
//! provenance banner.

mod patcher;
mod readme;

pub use patcher::{resolve, try_update, update, update_file, GlobOptions, Patterns};
pub use readme::{compose_readme, find_readme, prepend_note, rebundled_note};
