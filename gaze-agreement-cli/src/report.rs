//! Report generation
//!
//! Pair comparisons are printed as text or JSON; batch runs are written back out
//! as a copy of the roster with agreement columns appended.

use anyhow::{Context, Result};
use gaze_agreement::{AgreementError, AgreementStats};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Columns appended to every roster row
pub const RESULT_COLUMNS: [&str; 5] = [
    "percent_agree",
    "total_time_ms",
    "percent_agree_lr",
    "total_time_lr_ms",
    "error",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Result of comparing one pair of files
#[derive(Debug, Serialize)]
pub struct PairReport {
    pub base: PathBuf,
    pub comparison: PathBuf,
    /// RFC 3339 timestamp of when the comparison ran
    pub generated_at: String,
    #[serde(flatten)]
    pub stats: AgreementStats,
}

impl PairReport {
    pub fn new(base: &Path, comparison: &Path, stats: AgreementStats) -> Self {
        Self {
            base: base.to_path_buf(),
            comparison: comparison.to_path_buf(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            stats,
        }
    }

    pub fn write<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => {
                writeln!(out, "Base:       {:?}", self.base)?;
                writeln!(out, "Comparison: {:?}", self.comparison)?;
                writeln!(out, "{}", self.stats)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Agreement columns for one roster row
pub fn result_fields(outcome: &Result<AgreementStats>) -> [String; 5] {
    match outcome {
        Ok(stats) => [
            stats.raw_agreement.to_string(),
            stats.total_time_ms.to_string(),
            stats.lr_agreement.to_string(),
            stats.lr_total_time_ms.to_string(),
            String::new(),
        ],
        Err(e) => [
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            format!("{:#}", e),
        ],
    }
}

/// Write the roster back out with agreement columns appended to each row
pub fn write_batch_csv(
    path: &Path,
    headers: &csv::StringRecord,
    rows: &[csv::StringRecord],
    outcomes: &[Result<AgreementStats>],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;

    let mut header_row = headers.clone();
    for column in RESULT_COLUMNS {
        header_row.push_field(column);
    }
    writer.write_record(&header_row)?;

    for (row, outcome) in rows.iter().zip(outcomes) {
        let mut record = row.clone();
        for field in result_fields(outcome) {
            record.push_field(&field);
        }
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {:?}", path))?;
    Ok(())
}
