//! # Media Scanner
//!
//! Finds 16:9 images and videos across directory trees and reports
//! byte-identical copies among them.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Discovery, metadata extraction, deduplication, reports
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//!
//! ```rust,ignore
//! let result = Pipeline::builder()
//!     .paths(vec!["/media/photos".into()])
//!     .concurrency(8)
//!     .build()?
//!     .run()?;
//! write_report(&result, OutputFormat::Csv, None)?;
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use crate::core::pipeline::{CancellationToken, Pipeline, PipelineBuilder, ScanResult};
pub use crate::core::reporter::{write_report, OutputFormat};
pub use error::{MediaScanError, Result};

/// Initialize tracing for the binary
///
/// Honours `RUST_LOG`; otherwise logs warnings, or debug output when
/// `verbose` is set. Logs go to stderr so stdout carries only the report.
/// Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
