// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Loading persisted indexes, restricted to the terms a query needs.
//!
//! The three layouts persist differently but answer the same question:
//! which postings exist for these terms? The loader hides the difference
//! behind [`LoadedIndex`], whose two arms reflect the one real split —
//! dense numeric doc ids (simple, SPIMI) versus document-number keys
//! (segment layout).
//!
//! Only the SPIMI backend can avoid reading everything: it keeps the
//! meta-index in memory and seeks straight to each query term's line,
//! visiting terms in ascending order so the disk access stays sequential.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::binary::{
    codec_error, decode_dense_postings, decode_string, decode_varint, encode_dense_postings,
    encode_string, encode_varint, read_envelope, write_envelope,
};
use crate::error::{Error, Result};
use crate::paths::IndexPaths;
use crate::segments::{load_segment_filtered, SEGMENT_KEYS};
use crate::settings::IndexingMethod;
use crate::spimi::{load_meta_index, parse_posting_line};

/// A restricted in-memory view of one persisted index: only the terms the
/// query asked for, and of those only the ones that occur.
pub enum LoadedIndex {
    /// Postings keyed by dense doc id (simple and SPIMI layouts).
    Dense(HashMap<String, Vec<(u32, u32)>>),
    /// Postings keyed by document number (segment layout).
    ByDocno(HashMap<String, Vec<(String, u32)>>),
}

impl LoadedIndex {
    /// Number of distinct terms actually loaded.
    pub fn num_terms(&self) -> usize {
        match self {
            LoadedIndex::Dense(map) => map.len(),
            LoadedIndex::ByDocno(map) => map.len(),
        }
    }
}

/// Load the postings for `terms` from whichever layout was persisted.
pub fn load_for_terms(
    paths: &IndexPaths,
    method: IndexingMethod,
    terms: &BTreeSet<String>,
) -> Result<LoadedIndex> {
    match method {
        IndexingMethod::Simple => Ok(LoadedIndex::Dense(load_simple_filtered(
            &paths.simple_index(),
            |term| terms.contains(term),
        )?)),
        IndexingMethod::Spimi => Ok(LoadedIndex::Dense(load_spimi_restricted(paths, terms)?)),
        IndexingMethod::MapReduce => {
            let mut index = HashMap::new();
            for key in SEGMENT_KEYS {
                let segment =
                    load_segment_filtered(&paths.segment(key), |term| terms.contains(term))?;
                index.extend(segment);
            }
            Ok(LoadedIndex::ByDocno(index))
        }
    }
}

// ============================================================================
// SIMPLE LAYOUT
// ============================================================================

/// Persist the whole `term -> postings` map as one file. Terms are written
/// in sorted order so the artifact is deterministic.
pub fn save_simple(index: &HashMap<String, Vec<(u32, u32)>>, path: &Path) -> Result<()> {
    let mut entries: Vec<_> = index.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut buf = Vec::new();
    encode_varint(entries.len() as u64, &mut buf);
    for (term, postings) in entries {
        encode_string(term, &mut buf);
        encode_dense_postings(postings, &mut buf);
    }
    write_envelope(path, &buf)
}

/// Decode the simple-layout file, keeping terms for which `keep` is true.
pub fn load_simple_filtered(
    path: &Path,
    keep: impl Fn(&str) -> bool,
) -> Result<HashMap<String, Vec<(u32, u32)>>> {
    let payload = read_envelope(path)?;
    let wrap = |e| codec_error(path, e);

    let (count, mut pos) = decode_varint(&payload).map_err(wrap)?;
    let mut index = HashMap::new();
    for _ in 0..count {
        let (term, consumed) = decode_string(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (postings, consumed) = decode_dense_postings(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        if keep(&term) {
            index.insert(term, postings);
        }
    }
    Ok(index)
}

// ============================================================================
// SPIMI LAYOUT
// ============================================================================

/// Seek-and-read each query term's posting line. Terms absent from the
/// meta-index are silently skipped; a line whose term disagrees with the
/// meta-index is a corruption error.
fn load_spimi_restricted(
    paths: &IndexPaths,
    terms: &BTreeSet<String>,
) -> Result<HashMap<String, Vec<(u32, u32)>>> {
    let meta_index: HashMap<String, u64> = load_meta_index(paths)?.into_iter().collect();

    let path = paths.spimi_index();
    let file = File::open(&path).map_err(|e| Error::io(&path, e))?;
    let mut reader = BufReader::new(file);

    let mut index = HashMap::new();
    for term in terms {
        let Some(&offset) = meta_index.get(term) else {
            continue;
        };

        reader
            .seek(SeekFrom::Start(offset))
            .map_err(|e| Error::io(&path, e))?;
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| Error::io(&path, e))?;

        let (found, postings) = parse_posting_line(&line).ok_or_else(|| {
            Error::corrupt(
                &path,
                format!("unparsable posting line at offset {}", offset),
            )
        })?;
        if found != *term {
            return Err(Error::TermMismatch {
                path,
                expected: term.clone(),
                found,
            });
        }

        index.insert(term.clone(), postings);
    }
    Ok(index)
}
