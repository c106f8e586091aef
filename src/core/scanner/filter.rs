//! File filtering logic for the scanner.

use super::MediaKind;
use std::path::Path;

/// Filters files to determine if they are supported media
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    /// Whether to skip files and directories whose name starts with '.'
    skip_hidden: bool,
}

impl MediaFilter {
    /// Create a filter accepting every supported image and video extension
    pub fn new() -> Self {
        Self { skip_hidden: false }
    }

    /// Skip hidden files (starting with .)
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if self.skip_hidden && is_hidden(path) {
            return false;
        }
        MediaKind::from_path(path).is_some()
    }

    /// Check if a directory should be descended into
    pub fn should_descend(&self, path: &Path) -> bool {
        !(self.skip_hidden && is_hidden(path))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
