//! Batch comparison over a participant roster
//!
//! Every roster row names one annotation file that exists under both coding
//! directories. Rows are compared in parallel and each failure stays confined to
//! its own row.

use crate::config::AppConfig;
use crate::report;
use anyhow::{anyhow, bail, Context, Result};
use gaze_agreement::{compare_files, AgreementStats};
use rayon::prelude::*;
use std::path::Path;

/// Outcome counts of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Roster rows together with the header and the coding column position
struct Roster {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
    coding_index: usize,
}

fn read_roster(path: &Path, coding_column: &str) -> Result<Roster> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open roster: {:?}", path))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read roster header: {:?}", path))?
        .clone();

    let coding_index = headers
        .iter()
        .position(|h| h.trim() == coding_column)
        .ok_or_else(|| anyhow!("Roster {:?} has no '{}' column", path, coding_column))?;

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read roster rows: {:?}", path))?;

    Ok(Roster {
        headers,
        rows,
        coding_index,
    })
}

fn compare_row(
    row: &csv::StringRecord,
    coding_index: usize,
    config: &AppConfig,
) -> Result<AgreementStats> {
    let file_name = row.get(coding_index).map(str::trim).unwrap_or_default();
    if file_name.is_empty() {
        bail!("Roster row has no coding file name");
    }

    let base = config.coding.base_dir.join(file_name);
    let comparison = config.coding.comparison_dir.join(file_name);
    compare_files(&base, &comparison, &config.analysis)
        .with_context(|| format!("Failed to compare {}", file_name))
}

/// Run every roster row and write the annotated roster to the configured output
pub fn run_batch(config: &AppConfig, jobs: Option<usize>) -> Result<BatchSummary> {
    log::info!("Reading roster: {:?}", config.roster.path);
    let roster = read_roster(&config.roster.path, &config.roster.coding_column)?;
    log::info!("Comparing {} sessions", roster.rows.len());

    let run = || -> Vec<Result<AgreementStats>> {
        roster
            .rows
            .par_iter()
            .enumerate()
            .map(|(index, row)| {
                let outcome = compare_row(row, roster.coding_index, config);
                if let Err(e) = &outcome {
                    log::error!(
                        "Row {} ({}): {:#}",
                        index + 1,
                        row.get(roster.coding_index).unwrap_or(""),
                        e
                    );
                }
                outcome
            })
            .collect()
    };

    let outcomes = match jobs {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker pool")?
            .install(run),
        None => run(),
    };

    report::write_batch_csv(&config.output.path, &roster.headers, &roster.rows, &outcomes)?;
    log::info!("Wrote comparison roster: {:?}", config.output.path);

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    Ok(BatchSummary {
        succeeded: outcomes.len() - failed,
        failed,
    })
}
