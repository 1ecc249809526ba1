// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One place that knows every file name inside an index directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File names inside an index directory.
///
/// Indexing runs are one-shot: `clear()` wipes and recreates the directory
/// before anything is written, so a partially written index from an aborted
/// run is never read back.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    base: PathBuf,
}

impl IndexPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        IndexPaths { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Tokeniser flags and indexing method, as JSON.
    pub fn settings(&self) -> PathBuf {
        self.base.join("settings.json")
    }

    /// Collection statistics, pre-finalisation.
    pub fn collection_stats(&self) -> PathBuf {
        self.base.join("collection_stats.bin")
    }

    /// Per-document statistics (dl, avgtf).
    pub fn doc_stats(&self) -> PathBuf {
        self.base.join("doc_stats.bin")
    }

    /// DocId -> DocNo mapping. Absent for the segment layout, whose postings
    /// carry document numbers directly.
    pub fn doc_map(&self) -> PathBuf {
        self.base.join("doc_map.bin")
    }

    /// The simple layout: one file, whole map.
    pub fn simple_index(&self) -> PathBuf {
        self.base.join("simple_index.p")
    }

    /// One segment file per first-letter bucket.
    pub fn segment(&self, key: char) -> PathBuf {
        self.base.join(format!("index_{}.p", key))
    }

    /// The merged SPIMI posting file (text, one line per term).
    pub fn spimi_index(&self) -> PathBuf {
        self.base.join("spimi_index.txt")
    }

    /// Term -> byte offset into the SPIMI posting file.
    pub fn spimi_meta(&self) -> PathBuf {
        self.base.join("spimi_meta.bin")
    }

    /// Intermediate SPIMI run file; deleted after a successful merge.
    pub fn spimi_block(&self, blockno: usize) -> PathBuf {
        self.base.join(format!("spimi_block_{}.txt", blockno))
    }

    /// Wipe and recreate the index directory.
    pub fn clear(&self) -> Result<()> {
        if self.base.exists() {
            fs::remove_dir_all(&self.base).map_err(|e| Error::io(&self.base, e))?;
        }
        fs::create_dir_all(&self.base).map_err(|e| Error::io(&self.base, e))
    }
}
