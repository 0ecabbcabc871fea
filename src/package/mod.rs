//! Package module for rebundle.
//!
//! Handles package.json loading, the microbundle manifest transform, version
//! resolution and repository lookup.

mod manifest;
pub mod registry;
mod repository;
mod transform;
pub mod version;

pub use manifest::{detect_indent, Manifest};
pub use registry::{parse_versions, NpmRegistry, Registry};
pub use repository::{default_repository, normalize_url, GitRepo};
pub use transform::{
    prepare_for_microbundle, scoped_name, set_name_and_version, ConditionalExports,
    ExportsStrategy, MicrobundleOptions, ModuleType,
};
pub use version::resolve_version;
