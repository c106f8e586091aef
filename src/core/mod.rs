//! # Core Module
//!
//! The UI-agnostic scanning engine.
//!
//! ## Modules
//! - `aspect` - 16:9 test with tolerance
//! - `scanner` - Discovers media files in directories
//! - `reader` - Extracts dimensions, format and orientation
//! - `duplicate` - Finds byte-identical files by SHA-256
//! - `pipeline` - Orchestrates the full workflow
//! - `reporter` - Writes JSON and CSV reports

pub mod aspect;
pub mod duplicate;
mod lossy_path;
pub mod pipeline;
pub mod reader;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use aspect::{is_16_by_9, Aspect};
pub use duplicate::DuplicateGroup;
pub use pipeline::{Pipeline, ScanResult, ScanStatistics, SkippedFile};
pub use reader::MediaDescriptor;
pub use reporter::OutputFormat;
pub use scanner::MediaKind;
