// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The map-reduce flavoured segment layout.
//!
//! Terms are partitioned by first character into seven buckets keyed by the
//! upper bounds `a, f, k, p, u, z` with `o` as the catch-all for characters
//! beyond `z`. Each input file is a map task: tokenise and bin the stream.
//! The bins are shuffled together across files and each bucket is reduced
//! with the shared in-memory inverter, then persisted to its own
//! `index_<key>.p` file.
//!
//! Postings in this layout use the document number directly as the document
//! id, and the per-document statistics are keyed the same way. This is a
//! fixed compatibility choice, not an oversight.

use std::collections::HashMap;
use std::path::Path;

use crate::analyze::Analyzer;
use crate::binary::{
    codec_error, decode_docno_postings, decode_string, decode_varint, encode_docno_postings,
    encode_string, encode_varint, read_envelope, write_envelope,
};
use crate::corpus::read_documents;
use crate::error::Result;
use crate::invert::invert;
use crate::paths::IndexPaths;
use crate::stats::DocnoCorpus;

/// Bucket keys, in probe order. `o` is the catch-all and must stay last.
pub const SEGMENT_KEYS: [char; 7] = ['a', 'f', 'k', 'p', 'u', 'z', 'o'];

/// Bucket for a term: the first key among `a, f, k, p, u, z` that is >= the
/// lowercased first character, else `o`.
pub fn segment_key(term: &str) -> char {
    let first = term
        .chars()
        .next()
        .map_or('o', |c| c.to_ascii_lowercase());
    for &key in &SEGMENT_KEYS[..6] {
        if first <= key {
            return key;
        }
    }
    'o'
}

/// Per-bucket `(docno, term)` pair lists, accumulated across input files.
type SegmentBins = HashMap<char, Vec<(String, String)>>;

/// Outcome of a segment build: the statistics plus the term count written.
pub struct SegmentBuild {
    pub corpus: DocnoCorpus,
    pub num_terms: usize,
}

/// Map every input file into bins, shuffle, reduce each bucket, persist.
///
/// `on_file` fires after each input file is consumed (progress reporting).
pub fn build_segments(
    files: &[std::path::PathBuf],
    analyzer: &Analyzer,
    paths: &IndexPaths,
    mut on_file: impl FnMut(&Path),
) -> Result<SegmentBuild> {
    let mut bins: SegmentBins = HashMap::new();
    let mut corpus = DocnoCorpus::default();

    for file in files {
        // One map task per file: its own accumulator, folded in afterwards.
        let mut file_corpus = DocnoCorpus::default();
        for (docno, text) in read_documents(file)? {
            file_corpus.visit(&docno, &text, analyzer, &mut |docno, term| {
                bins.entry(segment_key(&term))
                    .or_default()
                    .push((docno.to_string(), term));
                Ok(())
            })?;
        }
        corpus.absorb(file_corpus);
        on_file(file);
    }

    let mut num_terms = 0;
    for key in SEGMENT_KEYS {
        let index = invert(bins.remove(&key).unwrap_or_default());
        num_terms += index.len();
        save_segment(&index, &paths.segment(key))?;
    }

    Ok(SegmentBuild { corpus, num_terms })
}

// ============================================================================
// SEGMENT FILE PERSISTENCE
// ============================================================================

/// Persist one bucket's `term -> [(docno, tf)]` map. Terms are written in
/// sorted order so the artifact is deterministic.
pub fn save_segment(index: &HashMap<String, Vec<(String, u32)>>, path: &Path) -> Result<()> {
    let mut entries: Vec<_> = index.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut buf = Vec::new();
    encode_varint(entries.len() as u64, &mut buf);
    for (term, postings) in entries {
        encode_string(term, &mut buf);
        encode_docno_postings(postings, &mut buf);
    }
    write_envelope(path, &buf)
}

/// Load one bucket file, keeping only terms for which `keep` returns true.
pub fn load_segment_filtered(
    path: &Path,
    keep: impl Fn(&str) -> bool,
) -> Result<HashMap<String, Vec<(String, u32)>>> {
    let payload = read_envelope(path)?;
    let wrap = |e| codec_error(path, e);

    let (count, mut pos) = decode_varint(&payload).map_err(wrap)?;
    let mut index = HashMap::new();
    for _ in 0..count {
        let (term, consumed) = decode_string(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (postings, consumed) = decode_docno_postings(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        if keep(&term) {
            index.insert(term, postings);
        }
    }
    Ok(index)
}
