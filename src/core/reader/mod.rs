//! # Reader Module
//!
//! Extracts normalized media descriptors from image and video files.
//!
//! ## Readers
//! - [`ImageReader`] - `image` crate + EXIF orientation, ImageMagick `identify` fallback
//! - [`VideoReader`] - `ffprobe`, first video stream
//!
//! Both delegate the actual metadata extraction to a [`MediaProbe`], so the
//! external tools can be swapped for stubs. Quarter-turn orientations swap
//! width and height so the stored dimensions are the displayed ones.
//!
//! ## Failure Model
//! A file no probe can read is logged and yields `Ok(None)`. An `Err` is
//! reserved for failures outside the probes (e.g., the file vanished before
//! it could be stat'ed) and ends up as a skipped file.

mod command;
mod identify;
mod probe;
mod still_image;
mod video;

pub use command::run_tool;
pub use identify::{parse_identify_output, IdentifyProbe};
pub use probe::{MediaProbe, Orientation, ProbeReport};
pub use still_image::{read_exif_orientation, ImageCrateProbe, ImageReader};
pub use video::{parse_ffprobe_output, FfprobeProbe, VideoReader};

use crate::core::aspect::Aspect;
use crate::core::lossy_path;
use crate::core::scanner::MediaKind;
use crate::error::ReadError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Normalized metadata for one media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    /// Absolute path, unique per scan
    #[serde(serialize_with = "lossy_path::serialize")]
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Displayed width in pixels
    pub width: u32,
    /// Displayed height in pixels
    pub height: u32,
    /// width / height, 0 when height is 0
    pub aspect_ratio: f64,
    #[serde(rename = "is16by9")]
    pub is_16_by_9: bool,
    /// Image format or video codec name
    pub format: String,
    /// File size in bytes
    pub size: u64,
    /// SHA-256 of the contents, set when duplicate detection ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<bool>,
    /// Path of the first-seen file with identical contents
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "lossy_path::serialize_option"
    )]
    pub duplicate_of: Option<PathBuf>,
}

impl MediaDescriptor {
    /// Create a descriptor from displayed dimensions
    pub fn new(
        path: PathBuf,
        kind: MediaKind,
        width: u32,
        height: u32,
        format: impl Into<String>,
        size: u64,
    ) -> Self {
        let aspect = Aspect::of(width, height);
        Self {
            path,
            kind,
            width,
            height,
            aspect_ratio: aspect.ratio,
            is_16_by_9: aspect.is_16_by_9,
            format: format.into(),
            size,
            hash: None,
            is_duplicate: None,
            duplicate_of: None,
        }
    }

    /// Attach the content hash
    pub fn with_hash(mut self, hash: String) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Mark as a duplicate of `original`
    pub fn with_duplicate_of(mut self, original: PathBuf) -> Self {
        self.is_duplicate = Some(true);
        self.duplicate_of = Some(original);
        self
    }
}

/// Trait for media readers
pub trait MediaReader: Send + Sync {
    /// The kind of media this reader produces
    fn kind(&self) -> MediaKind;

    /// Whether this reader handles the file, judged by extension
    fn can_handle(&self, path: &Path) -> bool {
        MediaKind::from_path(path) == Some(self.kind())
    }

    /// Extract a descriptor; `Ok(None)` means the file could not be read
    fn read(&self, path: &Path) -> Result<Option<MediaDescriptor>, ReadError>;
}

/// Apply orientation, stat the file and compute the aspect ratio
pub(crate) fn describe(
    path: &Path,
    kind: MediaKind,
    report: ProbeReport,
) -> Result<MediaDescriptor, ReadError> {
    let (width, height) = report.display_dimensions();
    let size = fs::metadata(path)
        .map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    Ok(MediaDescriptor::new(
        path.to_path_buf(),
        kind,
        width,
        height,
        report.format,
        size,
    ))
}

/// The readers used by a scan, consulted in order
pub struct ReaderSet {
    readers: Vec<Box<dyn MediaReader>>,
}

impl ReaderSet {
    /// An empty set; every file is left unread
    pub fn empty() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Image crate with `identify` fallback for images, `ffprobe` for videos
    pub fn standard(tool_timeout: Option<Duration>) -> Self {
        let image = ImageReader::new(Box::new(ImageCrateProbe::new()))
            .with_fallback(Box::new(IdentifyProbe::new(tool_timeout)));
        let video = VideoReader::new(Box::new(FfprobeProbe::new(tool_timeout)));

        Self::empty()
            .with_reader(Box::new(image))
            .with_reader(Box::new(video))
    }

    /// Add a reader
    pub fn with_reader(mut self, reader: Box<dyn MediaReader>) -> Self {
        self.readers.push(reader);
        self
    }

    /// The first reader that handles the path
    pub fn reader_for(&self, path: &Path) -> Option<&dyn MediaReader> {
        self.readers
            .iter()
            .find(|r| r.can_handle(path))
            .map(|r| r.as_ref())
    }
}

impl Default for ReaderSet {
    fn default() -> Self {
        Self::standard(Some(Duration::from_secs(30)))
    }
}
