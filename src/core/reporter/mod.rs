//! # Reporter Module
//!
//! Serializes a [`ScanResult`] for people and other programs.
//!
//! ## Formats
//! - **JSON** - the whole result (matches, skipped, duplicates, stats)
//! - **CSV** - one row per match, for spreadsheets

mod export;

pub use export::{export_csv, export_json, CSV_HEADER};

use crate::core::pipeline::ScanResult;
use crate::error::ReportError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Write a report to `destination`, or to stdout when `None`
pub fn write_report(
    result: &ScanResult,
    format: OutputFormat,
    destination: Option<&Path>,
) -> Result<(), ReportError> {
    match destination {
        Some(path) => {
            let file = File::create(path).map_err(|source| ReportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            export(result, format, &mut writer)?;
            writer.flush().map_err(|source| ReportError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        None => export(result, format, io::stdout().lock()),
    }
}

fn export<W: Write>(result: &ScanResult, format: OutputFormat, writer: W) -> Result<(), ReportError> {
    match format {
        OutputFormat::Json => export_json(result, writer),
        OutputFormat::Csv => export_csv(result, writer),
    }
}
