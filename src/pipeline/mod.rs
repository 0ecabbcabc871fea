//! Pipeline module for rebundle.
//!
//! Checks packages out, runs their stages in order and publishes them.

mod batch;
mod checkout;
mod rebundle;
mod stages;

pub use batch::{run_batch, BatchReport};
pub use checkout::{GitCheckout, SourceCheckout};
pub use rebundle::{RebundleOutcome, Rebundler};
pub use stages::{RebundleScripts, Stage, StageContext};
