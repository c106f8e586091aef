//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the scan pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// File discovery events
    Discovery(DiscoveryEvent),
    /// Metadata extraction events
    Extraction(ExtractionEvent),
    /// Content hashing events
    Hash(HashEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the discovery phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DiscoveryEvent {
    /// Discovery has started
    Started { roots: Vec<PathBuf> },
    /// One root has been walked
    RootScanned {
        root: PathBuf,
        /// Files found under this root
        files_found: usize,
        /// Running total across all roots so far
        total_files: usize,
    },
    /// A root or subdirectory could not be read; discovery continues
    Error { path: PathBuf, message: String },
    /// Discovery completed
    Completed { total_files: usize },
}

/// Events during the extraction phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractionEvent {
    /// Extraction has started
    Started { total_files: usize, concurrency: usize },
    /// A file has been processed
    Progress(ExtractionProgress),
    /// A file was recorded as skipped
    Skipped { path: PathBuf, reason: String },
    /// Extraction completed
    Completed { matches: usize, skipped: usize },
}

/// Progress information during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionProgress {
    /// Files processed so far
    pub completed: usize,
    /// Total files to process
    pub total: usize,
    /// The file that just finished
    pub current_path: PathBuf,
}

/// Events during the hashing phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Hashing has started
    Started { total_files: usize },
    /// Progress update during hashing
    Progress(HashProgress),
    /// A file could not be hashed and is left out of grouping
    Error { path: PathBuf, message: String },
    /// Hashing completed
    Completed {
        total_hashed: usize,
        duplicate_groups: usize,
    },
}

/// Progress information during hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Number of files hashed so far
    pub completed: usize,
    /// Total number of files to hash
    pub total: usize,
    /// The file that just finished
    pub current_path: PathBuf,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled
    Cancelled,
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Discovery,
    Extraction,
    Deduplication,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total candidate files discovered
    pub total_files: usize,
    /// Files matching 16:9
    pub match_count: usize,
    /// Duplicates among the matches (originals excluded)
    pub duplicate_count: usize,
    /// Files recorded as skipped
    pub skipped_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Discovery => write!(f, "Discovering files"),
            PipelinePhase::Extraction => write!(f, "Reading metadata"),
            PipelinePhase::Deduplication => write!(f, "Finding duplicates"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Extraction(ExtractionEvent::Progress(ExtractionProgress {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/media/clip.mp4"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Extraction(ExtractionEvent::Progress(p)) => {
                assert_eq!(p.completed, 10);
                assert_eq!(p.total, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            total_files: 1000,
            match_count: 120,
            duplicate_count: 15,
            skipped_count: 3,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"match_count\":120"));
    }

    #[test]
    fn phases_display_as_activity() {
        assert_eq!(PipelinePhase::Deduplication.to_string(), "Finding duplicates");
    }
}
