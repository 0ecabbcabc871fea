//! Runner module for rebundle.
//!
//! Handles the ambient execution context and running external commands
//! inside it.

pub mod context;
mod executor;

pub use context::{
    current, log, run_with_exec_options, ExecContext, ExecOptions, StdioMode,
};
pub use executor::{exec, exec_with, quote, ExecOutput};
