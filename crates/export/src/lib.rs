//! # Export Crate
//!
//! Turns saved jobs into something that leaves the application: CSV for
//! spreadsheets, JSON for other tools, and a printable text report.
//!
//! ## Public API
//!
//! - `export_jobs` / `export_to_path`: write a job list in an `ExportFormat`.
//! - `render_job_report` / `render_metrics`: plain-text reports.
//! - `NumberFormat`: rounding and currency rendering shared by all of the above.
//! - `ExportError`: The specific error types that can be returned from this crate.

pub mod csv;
pub mod error;
pub mod format;
pub mod json;
pub mod report;

pub use error::ExportError;
pub use format::NumberFormat;
pub use report::{render_job_report, render_metrics};

use core_types::Job;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Writes `jobs` to `writer` in the given format.
pub fn export_jobs<W: Write>(
    jobs: &[Job],
    format: ExportFormat,
    number_format: &NumberFormat,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => csv::write_csv(jobs, number_format, writer),
        ExportFormat::Json => json::write_json(jobs, writer),
    }
}

/// Creates (or truncates) the file at `path` and exports `jobs` into it.
pub fn export_to_path(
    jobs: &[Job],
    format: ExportFormat,
    number_format: &NumberFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    export_jobs(jobs, format, number_format, BufWriter::new(file))?;
    tracing::info!(path = %path.display(), %format, jobs = jobs.len(), "Exported jobs.");
    Ok(())
}
