//! # Pipeline Module
//!
//! Orchestrates a scan from directories to a finished [`ScanResult`].
//!
//! ## Pipeline Stages
//! 1. **Discovery** - Walk every root, in order, collecting media files
//! 2. **Extraction** - Read dimensions on a bounded worker pool
//! 3. **Deduplication** - Hash the 16:9 matches and group identical files
//!
//! ## Parallelism
//! Extraction runs on a dedicated rayon pool sized to the configured
//! concurrency, so no more than that many reads (and external tool
//! processes) are in flight. Results keep discovery order.

mod executor;
mod result;

pub use executor::{
    CancellationToken, Pipeline, PipelineBuilder, PipelineConfig, DEFAULT_CONCURRENCY,
    DEFAULT_TOOL_TIMEOUT,
};
pub use result::{ScanResult, ScanStatistics, SkippedFile};
