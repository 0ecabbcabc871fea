//! Running every configured package.

use anyhow::Result;
use tracing::Instrument;

use super::rebundle::{RebundleOutcome, Rebundler};
use super::stages::RebundleScripts;
use crate::runner;

/// Result of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Packages that went through the pipeline, in order.
    pub processed: Vec<RebundleOutcome>,
    /// Packages left out by `--include`.
    pub skipped: Vec<String>,
}

/// Rebundle `packages` in order, skipping those not included.
///
/// # Errors
///
/// Stops at the first package that fails and returns its error.
pub async fn run_batch(rebundler: &Rebundler, packages: &[&dyn RebundleScripts]) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for scripts in packages {
        let name = scripts.package();
        if !rebundler.flags().include.matches(name) {
            runner::log(format_args!("Skipping {name}, not specified via --include"));
            report.skipped.push(name.to_string());
            continue;
        }

        let span = tracing::info_span!("rebundle", package = name);
        let outcome = rebundler.rebundle(*scripts).instrument(span).await?;
        report.processed.push(outcome);
    }

    tracing::debug!(
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        "batch finished"
    );
    Ok(report)
}
