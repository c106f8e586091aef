//! Directory walking implementation using walkdir.

use super::{filter::MediaFilter, FileDiscoverer, RootListing};
use crate::error::ScanError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to skip hidden files and directories
    pub skip_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: MediaFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = MediaFilter::new().with_skip_hidden(config.skip_hidden);
        Self { config, filter }
    }

    fn classify_walk_error(err: walkdir::Error) -> ScanError {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
            ScanError::PermissionDenied { path }
        } else {
            ScanError::ReadDirectory {
                path,
                source: io::Error::from(err),
            }
        }
    }
}

/// Canonical form of `path`, so one file reached through `..` or a symlinked
/// root keeps a single identity. Falls back to the plain absolute path.
fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl FileDiscoverer for WalkDirScanner {
    fn discover_root(&self, root: &Path) -> Result<RootListing, ScanError> {
        let root = resolve(root);

        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound { path: root });
        }

        let mut walker = WalkDir::new(&root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let filter = &self.filter;
        let entries = walker.into_iter().filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_type().is_dir() || filter.should_descend(entry.path())
        });

        let mut listing = RootListing::default();

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if !self.filter.should_include(entry.path()) {
                        continue;
                    }
                    // Below a followed link the walk path is not the file's real location
                    let path = if self.config.follow_symlinks {
                        resolve(entry.path())
                    } else {
                        entry.into_path()
                    };
                    listing.files.push(path);
                }
                Err(e) if e.depth() == 0 => {
                    // The root itself could not be opened
                    return Err(Self::classify_walk_error(e));
                }
                Err(e) => {
                    let error = Self::classify_walk_error(e);
                    warn!("Skipping unreadable entry: {}", error);
                    listing.errors.push(error);
                }
            }
        }

        debug!(
            "Found {} media files under {}",
            listing.files.len(),
            root.display()
        );

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"not really media").unwrap();
        path
    }

    fn discover(config: ScanConfig, root: &Path) -> RootListing {
        WalkDirScanner::new(config).discover_root(root).unwrap()
    }

    #[test]
    fn empty_directory_yields_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let listing = discover(ScanConfig::default(), temp_dir.path());

        assert!(listing.files.is_empty());
        assert!(listing.errors.is_empty());
    }

    #[test]
    fn finds_images_and_videos_only() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "photo.jpg");
        create_file(temp_dir.path(), "clip.MOV");
        create_file(temp_dir.path(), "notes.txt");
        create_file(temp_dir.path(), "raw.cr2");

        let listing = discover(ScanConfig::default(), temp_dir.path());

        assert_eq!(listing.files.len(), 2);
        assert!(listing.files.iter().any(|p| p.ends_with("photo.jpg")));
        assert!(listing.files.iter().any(|p| p.ends_with("clip.MOV")));
    }

    #[test]
    fn traverses_nested_directories_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("b_nested");
        fs::create_dir(&nested).unwrap();

        create_file(temp_dir.path(), "c.png");
        create_file(temp_dir.path(), "a.png");
        create_file(&nested, "inner.mp4");

        let listing = discover(ScanConfig::default(), temp_dir.path());
        let names: Vec<_> = listing
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.png", "inner.mp4", "c.png"]);
    }

    #[test]
    fn returned_paths_are_absolute() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "photo.gif");

        let listing = discover(ScanConfig::default(), temp_dir.path());

        assert!(listing.files[0].is_absolute());
    }

    #[test]
    fn parent_components_in_root_are_resolved() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        let file = create_file(temp_dir.path(), "clip.mp4");

        let listing = discover(ScanConfig::default(), &temp_dir.path().join("sub").join(".."));

        assert_eq!(listing.files, vec![fs::canonicalize(file).unwrap()]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_root_lists_real_paths() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real");
        fs::create_dir(&real).unwrap();
        let file = create_file(&real, "photo.png");
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let listing = discover(ScanConfig::default(), &link);

        assert_eq!(listing.files, vec![fs::canonicalize(file).unwrap()]);
    }

    #[test]
    fn hidden_files_are_included_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "visible.jpg");
        create_file(temp_dir.path(), ".hidden.jpg");

        let listing = discover(ScanConfig::default(), temp_dir.path());

        assert_eq!(listing.files.len(), 2);
    }

    #[test]
    fn hidden_files_and_directories_can_be_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".thumbnails");
        fs::create_dir(&hidden_dir).unwrap();
        create_file(temp_dir.path(), "visible.jpg");
        create_file(temp_dir.path(), ".hidden.jpg");
        create_file(&hidden_dir, "thumb.jpg");

        let config = ScanConfig {
            skip_hidden: true,
            ..Default::default()
        };
        let listing = discover(config, temp_dir.path());

        assert_eq!(listing.files.len(), 1);
        assert!(listing.files[0].ends_with("visible.jpg"));
    }

    #[test]
    fn max_depth_limits_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        create_file(temp_dir.path(), "top.jpg");
        create_file(&nested, "deep.jpg");

        let config = ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let listing = discover(config, temp_dir.path());

        assert_eq!(listing.files.len(), 1);
        assert!(listing.files[0].ends_with("top.jpg"));
    }

    #[test]
    fn nonexistent_root_is_an_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.discover_root(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn file_given_as_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_file(temp_dir.path(), "photo.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        assert!(scanner.discover_root(&file).is_err());
    }
}
