//! Still image reader.
//!
//! Dimensions come from the `image` crate (header only, no full decode) and
//! orientation from the EXIF block via `kamadak-exif`. When the image crate
//! cannot handle a file, an external identification tool is tried before the
//! file is given up on.

use super::probe::{MediaProbe, Orientation, ProbeReport};
use super::{describe, MediaDescriptor, MediaReader};
use crate::core::scanner::MediaKind;
use crate::error::ReadError;
use exif::{In, Reader, Tag, Value};
use image::{ImageFormat, ImageReader as Decoder};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Probe backed by the `image` and `kamadak-exif` crates
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateProbe;

impl ImageCrateProbe {
    pub fn new() -> Self {
        Self
    }
}

impl MediaProbe for ImageCrateProbe {
    fn name(&self) -> &str {
        "image"
    }

    fn probe(&self, path: &Path) -> Result<ProbeReport, ReadError> {
        let io_error = |source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let decoder = Decoder::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?;

        let format = decoder
            .format()
            .map(format_name)
            .ok_or_else(|| ReadError::Decode {
                path: path.to_path_buf(),
                reason: "unrecognised image format".to_string(),
            })?;

        let (width, height) = decoder.into_dimensions().map_err(|e| ReadError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let orientation = read_exif_orientation(path)
            .map(Orientation::Exif)
            .unwrap_or_default();

        Ok(ProbeReport {
            width,
            height,
            format,
            orientation,
        })
    }
}

/// Lowercase format name, matching what identification tools report
fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        other => other
            .extensions_str()
            .first()
            .map(|ext| ext.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Read the EXIF orientation tag, if the container carries one
pub fn read_exif_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(&file);
    let exif_reader = Reader::new().read_from_container(&mut bufreader).ok()?;

    let field = exif_reader.get_field(Tag::Orientation, In::PRIMARY)?;
    match field.value {
        Value::Short(ref vec) => vec.first().copied(),
        Value::Long(ref vec) => vec.first().and_then(|v| u16::try_from(*v).ok()),
        _ => None,
    }
}

/// Reader for still images, with a fallback probe for formats the primary cannot decode
pub struct ImageReader {
    primary: Box<dyn MediaProbe>,
    fallback: Option<Box<dyn MediaProbe>>,
}

impl ImageReader {
    /// Create a reader with a primary probe and no fallback
    pub fn new(primary: Box<dyn MediaProbe>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Set the probe used when the primary fails
    pub fn with_fallback(mut self, fallback: Box<dyn MediaProbe>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn probe(&self, path: &Path) -> Option<ProbeReport> {
        let primary_error = match self.primary.probe(path) {
            Ok(report) => return Some(report),
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            warn!("Failed to read image {}: {}", path.display(), primary_error);
            return None;
        };

        debug!(
            "{} probe failed for {} ({}), trying {}",
            self.primary.name(),
            path.display(),
            primary_error,
            fallback.name()
        );

        match fallback.probe(path) {
            Ok(report) => Some(report),
            Err(fallback_error) => {
                warn!(
                    "Failed to read image {}: {}; {} fallback: {}",
                    path.display(),
                    primary_error,
                    fallback.name(),
                    fallback_error
                );
                None
            }
        }
    }
}

impl MediaReader for ImageReader {
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    fn read(&self, path: &Path) -> Result<Option<MediaDescriptor>, ReadError> {
        match self.probe(path) {
            Some(report) => describe(path, MediaKind::Image, report).map(Some),
            None => Ok(None),
        }
    }
}
