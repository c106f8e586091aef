//! The result model returned by a scan.

use crate::core::duplicate::DuplicateGroup;
use crate::core::lossy_path;
use crate::core::reader::MediaDescriptor;
use crate::events::PipelineSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file that could not be processed, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    #[serde(serialize_with = "lossy_path::serialize")]
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Aggregate counters for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    /// Candidate files discovered
    pub total_files: usize,
    /// Images read successfully
    pub images_processed: usize,
    /// Videos read successfully
    pub videos_processed: usize,
    pub match_count: usize,
    /// Duplicates among the matches, originals excluded
    pub duplicate_count: usize,
    pub skipped_count: usize,
    /// Wall time in milliseconds
    pub scan_duration: u64,
}

/// Everything a scan produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// 16:9 files in discovery order
    pub matches: Vec<MediaDescriptor>,
    pub skipped: Vec<SkippedFile>,
    pub duplicates: Vec<DuplicateGroup>,
    pub stats: ScanStatistics,
}

impl ScanResult {
    /// Condensed form sent with the completion event
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            total_files: self.stats.total_files,
            match_count: self.stats.match_count,
            duplicate_count: self.stats.duplicate_count,
            skipped_count: self.stats.skipped_count,
            duration_ms: self.stats.scan_duration,
        }
    }
}
