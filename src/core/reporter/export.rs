//! JSON and CSV serialization of scan results.

use crate::core::pipeline::ScanResult;
use crate::core::reader::MediaDescriptor;
use crate::error::ReportError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

/// CSV column order
pub const CSV_HEADER: [&str; 9] = [
    "path",
    "type",
    "width",
    "height",
    "aspectRatio",
    "format",
    "size",
    "isDuplicate",
    "duplicateOf",
];

/// Export the full result as pretty-printed JSON
///
/// Top-level keys: matches, skipped, duplicates, stats
pub fn export_json<W: Write>(result: &ScanResult, mut writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(serde_json::Error::io)?;
    Ok(())
}

/// Export the matches as CSV, one row per file
///
/// Skipped files and duplicate groups are not part of the CSV form.
pub fn export_csv<W: Write>(result: &ScanResult, writer: W) -> Result<(), ReportError> {
    let mut out = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(CSV_HEADER)?;
    for media in &result.matches {
        out.write_record(csv_row(media))?;
    }
    out.flush().map_err(csv::Error::from)?;

    Ok(())
}

fn csv_row(media: &MediaDescriptor) -> [String; 9] {
    [
        media.path.to_string_lossy().into_owned(),
        media.kind.to_string(),
        media.width.to_string(),
        media.height.to_string(),
        format!("{:.4}", media.aspect_ratio),
        media.format.clone(),
        media.size.to_string(),
        media.is_duplicate.unwrap_or(false).to_string(),
        media
            .duplicate_of
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default(),
    ]
}
