//! Video reader backed by ffprobe.

use super::command::run_tool;
use super::probe::{MediaProbe, Orientation, ProbeReport};
use super::{describe, MediaDescriptor, MediaReader};
use crate::core::scanner::MediaKind;
use crate::error::ReadError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::warn;

/// First video stream's size, codec and rotation (tag or display matrix)
const SHOW_ENTRIES: &str = "stream=width,height,codec_name:stream_tags=rotate:stream_side_data=rotation";

#[derive(Debug, Default, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    codec_name: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    rotate: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

/// Probe that runs `ffprobe` and reads its JSON output
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfprobeProbe {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
            timeout,
        }
    }

    /// Use a specific ffprobe binary
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl MediaProbe for FfprobeProbe {
    fn name(&self) -> &str {
        "ffprobe"
    }

    fn probe(&self, path: &Path) -> Result<ProbeReport, ReadError> {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            SHOW_ENTRIES,
            "-of",
            "json",
        ])
        .arg(path);

        let stdout = run_tool(cmd, self.name(), self.timeout)?;
        parse_ffprobe_output(path, &stdout)
    }
}

/// Turn ffprobe's JSON into a probe report for the first video stream
pub fn parse_ffprobe_output(path: &Path, json: &[u8]) -> Result<ProbeReport, ReadError> {
    let output: FfprobeOutput = serde_json::from_slice(json).map_err(|e| ReadError::Parse {
        tool: "ffprobe".to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ReadError::NoVideoStream {
            path: path.to_path_buf(),
        })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(ReadError::MissingDimensions {
                path: path.to_path_buf(),
            })
        }
    };

    // Older muxers write a rotate tag; newer ffprobe only exposes the display matrix
    let orientation = match stream.tags.rotate.as_deref() {
        Some(tag) => Orientation::from_rotate_tag(Some(tag)),
        None => stream
            .side_data_list
            .iter()
            .find_map(|side| side.rotation)
            .map(|degrees| Orientation::Degrees(degrees.round() as i32))
            .unwrap_or_default(),
    };

    Ok(ProbeReport {
        width,
        height,
        format: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
        orientation,
    })
}

/// Reader for video containers
pub struct VideoReader {
    probe: Box<dyn MediaProbe>,
}

impl VideoReader {
    pub fn new(probe: Box<dyn MediaProbe>) -> Self {
        Self { probe }
    }
}

impl MediaReader for VideoReader {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn read(&self, path: &Path) -> Result<Option<MediaDescriptor>, ReadError> {
        match self.probe.probe(path) {
            Ok(report) => describe(path, MediaKind::Video, report).map(Some),
            Err(e) => {
                warn!("Failed to read video {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}
