//! Pipeline execution implementation.

use super::result::{ScanResult, ScanStatistics, SkippedFile};
use crate::core::duplicate::{find_duplicates, total_duplicates, DuplicateGroup, DuplicateIndex};
use crate::core::reader::{MediaDescriptor, ReaderSet};
use crate::core::scanner::{FileDiscoverer, MediaKind, ScanConfig, WalkDirScanner};
use crate::error::{MediaScanError, ReadError, ScanError};
use crate::events::{
    null_sender, DiscoveryEvent, Event, EventSender, ExtractionEvent, ExtractionProgress,
    HashEvent, HashProgress, PipelineEvent, PipelinePhase,
};
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default number of files read at once
pub const DEFAULT_CONCURRENCY: usize = 25;

/// Default limit for a single external tool invocation
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared flag for stopping a scan from another thread
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the scan stops at its next check point
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directories to scan, in order
    pub paths: Vec<PathBuf>,
    /// Maximum files read at once
    pub concurrency: usize,
    /// Hash matches and group identical files
    pub detect_duplicates: bool,
    /// Scanner configuration
    pub scan_config: ScanConfig,
    /// Limit for each external tool call (None = wait forever)
    pub tool_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            detect_duplicates: true,
            scan_config: ScanConfig::default(),
            tool_timeout: Some(DEFAULT_TOOL_TIMEOUT),
        }
    }
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    readers: Option<ReaderSet>,
    discoverer: Option<Box<dyn FileDiscoverer>>,
    cancellation: Option<CancellationToken>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    /// Set the number of files read at once
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Enable or disable duplicate detection
    pub fn detect_duplicates(mut self, enabled: bool) -> Self {
        self.config.detect_duplicates = enabled;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Skip hidden files and directories
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.config.scan_config.skip_hidden = skip;
        self
    }

    /// Set the timeout for external tools used by the standard readers
    pub fn tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    /// Replace the standard readers
    pub fn readers(mut self, readers: ReaderSet) -> Self {
        self.readers = Some(readers);
        self
    }

    /// Replace the walkdir-based discoverer
    pub fn discoverer(mut self, discoverer: Box<dyn FileDiscoverer>) -> Self {
        self.discoverer = Some(discoverer);
        self
    }

    /// Share a cancellation token with the caller
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<Pipeline, MediaScanError> {
        if self.config.concurrency == 0 {
            return Err(MediaScanError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        let readers = self
            .readers
            .unwrap_or_else(|| ReaderSet::standard(self.config.tool_timeout));
        let discoverer = self.discoverer.unwrap_or_else(|| -> Box<dyn FileDiscoverer> {
            Box::new(WalkDirScanner::new(self.config.scan_config.clone()))
        });

        Ok(Pipeline {
            config: self.config,
            readers,
            discoverer,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

/// Outcome of reading one file
enum Extraction {
    Read(MediaDescriptor),
    Unread,
    Skipped(SkippedFile),
}

/// The scan pipeline: discovery, extraction, deduplication
pub struct Pipeline {
    config: PipelineConfig,
    readers: ReaderSet,
    discoverer: Box<dyn FileDiscoverer>,
    cancellation: CancellationToken,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Token that cancels this pipeline's runs
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<ScanResult, MediaScanError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<ScanResult, MediaScanError> {
        events.send(Event::Pipeline(PipelineEvent::Started));

        let outcome = self.execute(events);

        if let Err(MediaScanError::Scan(ScanError::Cancelled)) = &outcome {
            info!("Scan cancelled");
            events.send(Event::Pipeline(PipelineEvent::Cancelled));
        }

        outcome
    }

    fn execute(&self, events: &EventSender) -> Result<ScanResult, MediaScanError> {
        let start_time = Instant::now();

        // Phase 1: Discovery
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Discovery,
        }));
        let files = self.discover(events)?;
        let total_files = files.len();

        // Phase 2: Extraction
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Extraction,
        }));
        let outcomes = self.extract_all(&files, events)?;

        let mut images_processed = 0;
        let mut videos_processed = 0;
        let mut matches = Vec::new();
        let mut skipped = Vec::new();

        for outcome in outcomes {
            match outcome {
                Extraction::Read(media) => {
                    match media.kind {
                        MediaKind::Image => images_processed += 1,
                        MediaKind::Video => videos_processed += 1,
                    }
                    if media.is_16_by_9 {
                        matches.push(media);
                    }
                }
                Extraction::Unread => {}
                Extraction::Skipped(file) => skipped.push(file),
            }
        }

        events.send(Event::Extraction(ExtractionEvent::Completed {
            matches: matches.len(),
            skipped: skipped.len(),
        }));

        // Phase 3: Deduplication
        let mut duplicates = Vec::new();
        if self.config.detect_duplicates && !matches.is_empty() {
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Deduplication,
            }));
            let (marked, groups) = self.deduplicate(matches, events)?;
            matches = marked;
            duplicates = groups;
        }

        let stats = ScanStatistics {
            total_files,
            images_processed,
            videos_processed,
            match_count: matches.len(),
            duplicate_count: total_duplicates(&duplicates),
            skipped_count: skipped.len(),
            scan_duration: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Scanned {} files: {} matches, {} duplicates, {} skipped",
            stats.total_files, stats.match_count, stats.duplicate_count, stats.skipped_count
        );

        let result = ScanResult {
            matches,
            skipped,
            duplicates,
            stats,
        };

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: result.summary(),
        }));

        Ok(result)
    }

    fn check_cancelled(&self) -> Result<(), ScanError> {
        if self.cancellation.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Walk every root in order; a root that cannot be read contributes nothing
    fn discover(&self, events: &EventSender) -> Result<Vec<PathBuf>, ScanError> {
        events.send(Event::Discovery(DiscoveryEvent::Started {
            roots: self.config.paths.clone(),
        }));

        let mut files = Vec::new();
        let mut seen = HashSet::new();

        for root in &self.config.paths {
            self.check_cancelled()?;

            let found = match self.discoverer.discover_root(root) {
                Ok(listing) => {
                    for error in &listing.errors {
                        events.send(Event::Discovery(DiscoveryEvent::Error {
                            path: error.path().unwrap_or(root.as_path()).to_path_buf(),
                            message: error.to_string(),
                        }));
                    }
                    let before = files.len();
                    // Overlapping roots would otherwise report one file twice
                    files.extend(listing.files.into_iter().filter(|f| seen.insert(f.clone())));
                    files.len() - before
                }
                Err(e) => {
                    warn!("Skipping {}: {}", root.display(), e);
                    events.send(Event::Discovery(DiscoveryEvent::Error {
                        path: e.path().unwrap_or(root.as_path()).to_path_buf(),
                        message: e.to_string(),
                    }));
                    0
                }
            };

            debug!("Found {} media files under {}", found, root.display());
            events.send(Event::Discovery(DiscoveryEvent::RootScanned {
                root: root.clone(),
                files_found: found,
                total_files: files.len(),
            }));
        }

        events.send(Event::Discovery(DiscoveryEvent::Completed {
            total_files: files.len(),
        }));

        Ok(files)
    }

    /// Read every file on a pool of `concurrency` workers, keeping discovery order
    fn extract_all(
        &self,
        files: &[PathBuf],
        events: &EventSender,
    ) -> Result<Vec<Extraction>, ScanError> {
        let total = files.len();
        events.send(Event::Extraction(ExtractionEvent::Started {
            total_files: total,
            concurrency: self.config.concurrency,
        }));

        if files.is_empty() {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency)
            .thread_name(|i| format!("media-reader-{i}"))
            .build()
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        let completed = AtomicUsize::new(0);

        pool.install(|| {
            files
                .par_iter()
                .map(|path| -> Result<Extraction, ScanError> {
                    self.check_cancelled()?;

                    let outcome = self.extract(path);

                    if let Extraction::Skipped(file) = &outcome {
                        events.send(Event::Extraction(ExtractionEvent::Skipped {
                            path: file.path.clone(),
                            reason: file.reason.clone(),
                        }));
                    }

                    let current_completed = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    events.send(Event::Extraction(ExtractionEvent::Progress(
                        ExtractionProgress {
                            completed: current_completed,
                            total,
                            current_path: path.clone(),
                        },
                    )));

                    Ok(outcome)
                })
                .collect()
        })
    }

    /// Read one file; errors and reader panics become skipped files
    fn extract(&self, path: &Path) -> Extraction {
        let Some(reader) = self.readers.reader_for(path) else {
            debug!("No reader for {}", path.display());
            return Extraction::Skipped(SkippedFile::new(path, "Unsupported file type"));
        };

        match panic::catch_unwind(AssertUnwindSafe(|| reader.read(path))) {
            Ok(Ok(Some(media))) => Extraction::Read(media),
            Ok(Ok(None)) => Extraction::Unread,
            Ok(Err(e)) => {
                warn!("Skipping {}: {}", path.display(), e);
                Extraction::Skipped(SkippedFile::new(path, e.to_string()))
            }
            Err(payload) => {
                let error = ReadError::Panicked {
                    path: path.to_path_buf(),
                    message: panic_message(payload.as_ref()),
                };
                warn!("{}", error);
                Extraction::Skipped(SkippedFile::new(path, error.to_string()))
            }
        }
    }

    /// Hash matches in order, group them and stamp hash/duplicate fields
    fn deduplicate(
        &self,
        matches: Vec<MediaDescriptor>,
        events: &EventSender,
    ) -> Result<(Vec<MediaDescriptor>, Vec<DuplicateGroup>), ScanError> {
        let total = matches.len();
        events.send(Event::Hash(HashEvent::Started { total_files: total }));

        self.check_cancelled()?;

        let paths: Vec<PathBuf> = matches.iter().map(|m| m.path.clone()).collect();
        let scan = find_duplicates(&paths, |completed, path, error| {
            if let Some(e) = error {
                events.send(Event::Hash(HashEvent::Error {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }));
            }
            events.send(Event::Hash(HashEvent::Progress(HashProgress {
                completed,
                total,
                current_path: path.to_path_buf(),
            })));
            self.check_cancelled()
        })?;

        let hashed = scan.hashed();
        let groups = scan.groups;
        let index = DuplicateIndex::from_groups(&groups);

        let marked = matches
            .into_iter()
            .zip(scan.hashes)
            .map(|(media, hash)| {
                let media = match hash {
                    Some(hash) => media.with_hash(hash),
                    None => media,
                };
                match index.original_of(&media.path).map(Path::to_path_buf) {
                    Some(original) => media.with_duplicate_of(original),
                    None => media,
                }
            })
            .collect();

        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: hashed,
            duplicate_groups: groups.len(),
        }));

        Ok((marked, groups))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
