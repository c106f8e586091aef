//! # Duplicate Module
//!
//! Finds byte-identical files among the matches.
//!
//! ## How It Works
//! 1. Stream each file through SHA-256 in 256 KiB chunks
//! 2. Group paths by digest, keeping discovery order
//! 3. The first path of each group is the original; the rest are duplicates
//!
//! Hashing failures are logged and the file simply takes no part in grouping.

mod grouper;
mod hasher;

pub use grouper::{find_duplicates, DuplicateScan};
pub use hasher::{hash_file, HASH_CHUNK_SIZE};

use crate::core::lossy_path;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files sharing one content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Hex SHA-256 digest
    pub hash: String,
    /// Paths in discovery order; the first is the original
    #[serde(serialize_with = "lossy_path::serialize_all")]
    pub files: Vec<PathBuf>,
    pub count: usize,
}

impl DuplicateGroup {
    pub fn new(hash: String, files: Vec<PathBuf>) -> Self {
        let count = files.len();
        Self { hash, files, count }
    }

    /// The first-seen file of the group
    pub fn original(&self) -> Option<&Path> {
        self.files.first().map(PathBuf::as_path)
    }

    /// Number of duplicates (excluding the original)
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Total duplicates across groups, originals excluded
pub fn total_duplicates(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(DuplicateGroup::duplicate_count).sum()
}

/// Maps every duplicate path to the original it copies
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    originals: HashMap<PathBuf, PathBuf>,
}

impl DuplicateIndex {
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        let mut originals = HashMap::new();
        for group in groups {
            if let Some((original, copies)) = group.files.split_first() {
                for copy in copies {
                    originals.insert(copy.clone(), original.clone());
                }
            }
        }
        Self { originals }
    }

    /// The original a path duplicates, if it is a duplicate
    pub fn original_of(&self, path: &Path) -> Option<&Path> {
        self.originals.get(path).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}
