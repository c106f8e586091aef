//! # Error Module
//!
//! Error types for the media scanner.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, tool names, what went wrong
//! - **Per-file failures are recoverable** - only structural failures reach the caller

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum MediaScanError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering files or driving the scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Scan was cancelled")]
    Cancelled,
}

impl ScanError {
    /// The directory or entry the error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ScanError::DirectoryNotFound { path }
            | ScanError::PermissionDenied { path }
            | ScanError::ReadDirectory { path, .. } => Some(path),
            ScanError::WorkerPool(_) | ScanError::Cancelled => None,
        }
    }
}

/// Errors that occur while extracting media metadata
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("Could not parse {tool} output for {path}: {reason}")]
    Parse {
        tool: String,
        path: PathBuf,
        reason: String,
    },

    #[error("No video streams found in {path}")]
    NoVideoStream { path: PathBuf },

    #[error("Missing width/height in {path}")]
    MissingDimensions { path: PathBuf },

    #[error("Reader panicked on {path}: {message}")]
    Panicked { path: PathBuf, message: String },
}

/// Errors that occur while hashing file contents
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to hash {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while writing reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, MediaScanError>;
