//! # Scanner Module
//!
//! Discovers candidate media files in directory trees.
//!
//! ## Supported Formats
//! - Images: .jpg, .jpeg, .png, .webp, .avif, .tiff, .tif, .gif
//! - Videos: .mp4, .mov, .avi, .mkv, .webm, .m4v
//!
//! Extensions are matched case-insensitively.
//!
//! ## Example
//! ```rust,ignore
//! use media_scanner::core::scanner::{FileDiscoverer, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let listing = scanner.discover_root(Path::new("/media/videos"))?;
//! ```

mod filter;
mod walker;

pub use filter::MediaFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Image extensions handled by the image reader
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "tiff", "tif", "gif"];

/// Video extensions handled by the video reader
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

/// Broad media category, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files discovered under one root
#[derive(Debug, Default)]
pub struct RootListing {
    /// Absolute paths of supported files, in walk order
    pub files: Vec<PathBuf>,
    /// Subdirectories or entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for file discoverers
///
/// Implement this trait to substitute the filesystem walk (e.g., for testing).
pub trait FileDiscoverer: Send + Sync {
    /// List supported files under a single root.
    ///
    /// An `Err` means the root itself could not be read; the caller treats
    /// that root as contributing no files.
    fn discover_root(&self, root: &Path) -> Result<RootListing, ScanError>;
}
