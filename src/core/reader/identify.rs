//! ImageMagick `identify` probe, used when the image crate cannot decode a file.

use super::command::run_tool;
use super::probe::{MediaProbe, Orientation, ProbeReport};
use crate::error::ReadError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Width, height, format and orientation of the first frame
const IDENTIFY_FORMAT: &str = "%w %h %m %[orientation]\n";

/// Probe that shells out to ImageMagick's `identify`
#[derive(Debug, Clone)]
pub struct IdentifyProbe {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl IdentifyProbe {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            program: PathBuf::from("identify"),
            timeout,
        }
    }

    /// Use a specific binary (e.g., `/opt/homebrew/bin/identify`)
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl MediaProbe for IdentifyProbe {
    fn name(&self) -> &str {
        "identify"
    }

    fn probe(&self, path: &Path) -> Result<ProbeReport, ReadError> {
        // "[0]" restricts multi-frame files (GIF, TIFF) to their first frame
        let mut first_frame = OsString::from(path.as_os_str());
        first_frame.push("[0]");

        let mut cmd = Command::new(&self.program);
        cmd.arg("-format").arg(IDENTIFY_FORMAT).arg(first_frame);

        let stdout = run_tool(cmd, self.name(), self.timeout)?;
        parse_identify_output(path, &String::from_utf8_lossy(&stdout))
    }
}

/// Parse one line of `identify -format "%w %h %m %[orientation]"` output
pub fn parse_identify_output(path: &Path, output: &str) -> Result<ProbeReport, ReadError> {
    let parse_error = |reason: &str| ReadError::Parse {
        tool: "identify".to_string(),
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let line = output
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| parse_error("empty output"))?;

    let mut fields = line.split_whitespace();
    let width = fields
        .next()
        .and_then(|w| w.parse::<u32>().ok())
        .ok_or_else(|| parse_error("missing width"))?;
    let height = fields
        .next()
        .and_then(|h| h.parse::<u32>().ok())
        .ok_or_else(|| parse_error("missing height"))?;
    let format = fields
        .next()
        .map(|f| f.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());
    let orientation = fields
        .next()
        .and_then(orientation_from_name)
        .map(Orientation::Exif)
        .unwrap_or_default();

    Ok(ProbeReport {
        width,
        height,
        format,
        orientation,
    })
}

/// Map ImageMagick orientation names onto EXIF tag values
fn orientation_from_name(name: &str) -> Option<u16> {
    match name {
        "TopLeft" => Some(1),
        "TopRight" => Some(2),
        "BottomRight" => Some(3),
        "BottomLeft" => Some(4),
        "LeftTop" => Some(5),
        "RightTop" => Some(6),
        "RightBottom" => Some(7),
        "LeftBottom" => Some(8),
        _ => None,
    }
}
