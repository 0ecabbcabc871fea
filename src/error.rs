//! Custom error types for rebundle.
//!
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for rebundle.
pub mod exit_code {
    /// Success.
    pub const SUCCESS: i32 = 0;
    /// General error.
    pub const GENERAL_ERROR: i32 = 1;
    /// Repository or configuration could not be determined.
    pub const INVALID_CONFIG: i32 = 2;
    /// Manifest could not be transformed.
    pub const TRANSFORM_FAILED: i32 = 3;
    /// No version could be resolved.
    pub const INVALID_VERSION: i32 = 4;
    /// An external command failed.
    pub const COMMAND_FAILED: i32 = 5;
}

/// Main error type for rebundle.
#[derive(Error, Debug)]
pub enum RebundleError {
    /// The repository of a package could not be located.
    #[error("Couldn't find a repository for {package}: {message}")]
    Configuration { package: String, message: String },

    /// The manifest already has an export map that would have to be merged.
    #[error("{package} already declares an `exports` map\n\nTip: Use ExportsStrategy::Overwrite to replace it explicitly.")]
    UnsupportedTransform { package: String },

    /// A glob pattern matched no files.
    #[error("Expected matches for {pattern}, got 0")]
    NoMatches { pattern: String },

    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// No valid version could be resolved.
    #[error("{message}")]
    InvalidVersion { message: String },

    /// A command exited unsuccessfully.
    #[error("Command failed with {}: {command}", describe_code(.code))]
    ExternalProcess { command: String, code: Option<i32> },

    /// package.json is not usable.
    #[error("Invalid manifest at {path}:\n  {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// No host project was found.
    #[error("No package.json found in {path} or {depth} parent directories\n\nTip: Run rebundle from the project that depends on the packages, or pass --host-dir.")]
    NoHostManifest { path: PathBuf, depth: usize },

    /// The clone didn't produce exactly one directory.
    #[error("Expected exactly one directory in {path}, found {found}")]
    UnexpectedCheckout { path: PathBuf, found: usize },

    /// Invalid configuration file.
    #[error("Invalid config at {path}:\n  {message}\n\nTip: Check the config file syntax and ensure all values are valid.")]
    InvalidConfig { path: PathBuf, message: String },

    /// IO error with path context.
    #[error("Failed to {operation} '{path}': {source}")]
    IoWithContext {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RebundleError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RebundleError::Configuration { .. } => exit_code::INVALID_CONFIG,
            RebundleError::InvalidConfig { .. } => exit_code::INVALID_CONFIG,
            RebundleError::NoHostManifest { .. } => exit_code::INVALID_CONFIG,
            RebundleError::UnexpectedCheckout { .. } => exit_code::GENERAL_ERROR,
            RebundleError::UnsupportedTransform { .. } => exit_code::TRANSFORM_FAILED,
            RebundleError::NoMatches { .. } => exit_code::TRANSFORM_FAILED,
            RebundleError::InvalidPattern { .. } => exit_code::TRANSFORM_FAILED,
            RebundleError::InvalidManifest { .. } => exit_code::TRANSFORM_FAILED,
            RebundleError::InvalidVersion { .. } => exit_code::INVALID_VERSION,
            RebundleError::ExternalProcess { .. } => exit_code::COMMAND_FAILED,
            RebundleError::IoWithContext { .. } => exit_code::GENERAL_ERROR,
            RebundleError::Io(_) => exit_code::GENERAL_ERROR,
        }
    }

    /// Create an IO error that remembers what was being done and where.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RebundleError::IoWithContext {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create an invalid version error.
    pub fn invalid_version(message: impl Into<String>) -> Self {
        RebundleError::InvalidVersion {
            message: message.into(),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result type alias for rebundle operations.
pub type Result<T> = std::result::Result<T, RebundleError>;
