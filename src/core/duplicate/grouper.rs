//! Groups files by content hash.
//!
//! Groups and the paths inside them keep discovery order: the first path of a
//! group is the original, the rest are its duplicates.

use super::hasher::hash_file;
use super::DuplicateGroup;
use crate::error::HashError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Accumulates content hashes and groups identical files
#[derive(Debug, Default)]
pub struct DuplicateDetector {
    buckets: Vec<(String, Vec<PathBuf>)>,
    index: HashMap<String, usize>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path under an already computed hash
    pub fn insert(&mut self, path: PathBuf, hash: String) {
        match self.index.get(&hash) {
            Some(&slot) => self.buckets[slot].1.push(path),
            None => {
                self.index.insert(hash.clone(), self.buckets.len());
                self.buckets.push((hash, vec![path]));
            }
        }
    }

    /// Hash a file and record it, returning the hash
    pub fn hash_and_insert(&mut self, path: &Path) -> Result<String, HashError> {
        let hash = hash_file(path)?;
        self.insert(path.to_path_buf(), hash.clone());
        Ok(hash)
    }

    /// Hashes shared by two or more files, in order of first appearance
    pub fn into_groups(self) -> Vec<DuplicateGroup> {
        self.buckets
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(hash, files)| DuplicateGroup::new(hash, files))
            .collect()
    }
}

/// Hashes and groups for an ordered list of files
#[derive(Debug, Default)]
pub struct DuplicateScan {
    /// One entry per input path; `None` where hashing failed
    pub hashes: Vec<Option<String>>,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateScan {
    /// Number of files that were hashed successfully
    pub fn hashed(&self) -> usize {
        self.hashes.iter().filter(|h| h.is_some()).count()
    }
}

/// Hash every path in order and group identical contents.
///
/// Files that cannot be hashed are logged and left out of grouping.
/// `on_file` is called after each file with the number completed, the path
/// and the hashing error if there was one. An `Err` from it stops the run.
pub fn find_duplicates<F, E>(paths: &[PathBuf], mut on_file: F) -> Result<DuplicateScan, E>
where
    F: FnMut(usize, &Path, Option<&HashError>) -> Result<(), E>,
{
    let mut detector = DuplicateDetector::new();
    let mut hashes = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        match detector.hash_and_insert(path) {
            Ok(hash) => {
                hashes.push(Some(hash));
                on_file(i + 1, path, None)?;
            }
            Err(e) => {
                warn!("{}", e);
                hashes.push(None);
                on_file(i + 1, path, Some(&e))?;
            }
        }
    }

    Ok(DuplicateScan {
        hashes,
        groups: detector.into_groups(),
    })
}
