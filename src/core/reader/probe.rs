//! Metadata probe capability shared by the readers.

use crate::error::ReadError;
use std::path::Path;

/// How the encoded pixels are turned for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// No orientation information
    #[default]
    Unspecified,
    /// EXIF orientation tag (1-8)
    Exif(u16),
    /// Rotation in degrees, as reported by container metadata
    Degrees(i32),
}

impl Orientation {
    /// Parse a video `rotate` tag such as "90" or "-270"
    pub fn from_rotate_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.trim().parse::<i32>().ok())
            .map(Orientation::Degrees)
            .unwrap_or_default()
    }

    /// Whether displayed width and height are swapped relative to the encoded pixels.
    ///
    /// EXIF tags 5-8 are the quarter-turn variants (with or without mirroring).
    pub fn swaps_axes(&self) -> bool {
        match *self {
            Orientation::Unspecified => false,
            Orientation::Exif(tag) => (5..=8).contains(&tag),
            Orientation::Degrees(degrees) => matches!(degrees.rem_euclid(360), 90 | 270),
        }
    }
}

/// Raw dimensions as reported by a probe, before orientation is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub width: u32,
    pub height: u32,
    /// Container or codec name (e.g., "jpeg", "h264")
    pub format: String,
    pub orientation: Orientation,
}

impl ProbeReport {
    /// Width and height as displayed
    pub fn display_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Trait for metadata probes
///
/// Library-backed and process-backed implementations are interchangeable,
/// and tests substitute stubs so no external tool is needed.
pub trait MediaProbe: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Read dimensions, format and orientation of a file
    fn probe(&self, path: &Path) -> Result<ProbeReport, ReadError>;
}
