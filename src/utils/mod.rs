//! Utility module for rebundle.
//!
//! Path helpers for the host project, checkouts and config files.

mod paths;

pub use paths::{
    find_package_json, find_project_root, global_config_file, local_config_file,
    single_subdirectory, MAX_SEARCH_DEPTH,
};
