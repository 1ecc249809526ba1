// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document and collection statistics, and the ingestion visitors that
//! accumulate them.
//!
//! The scoring functions need, per document, its length `dl` and average
//! term frequency `avgtf = dl / |unique terms|`; and, per collection, the
//! document count `N`, the average document length `avgdl`, and the mean of
//! per-document average term frequencies `mavgtf`. The raw sums are
//! accumulated during ingestion and persisted pre-finalisation; the derived
//! quantities are computed once at load time so the scoring loop touches
//! only precomputed values.
//!
//! Ingestion threads the accumulators explicitly: a visitor owns them and a
//! sink callback receives each `(id, term)` pair as it is produced. The
//! SPIMI block writer, the segment binner, and the simple collector are all
//! just sinks.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::analyze::Analyzer;
use crate::binary::{
    codec_error, decode_f64, decode_string, decode_varint, encode_f64, encode_string,
    encode_varint, read_envelope, write_envelope,
};
use crate::error::Result;

/// Statistics for a single non-empty document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStats {
    /// Total token count, with repeats.
    pub dl: u32,
    /// `dl / |unique terms in the document|`.
    pub avgtf: f64,
}

// ============================================================================
// COLLECTION STATISTICS
// ============================================================================

/// Raw collection-level sums, accumulated during ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollectionStatistics {
    /// Number of documents that produced at least one token.
    pub num_documents: u64,
    /// Sum of document lengths.
    pub total_doc_length: u64,
    /// Sum of per-document average term frequencies.
    pub sum_avgtf: f64,
}

/// Collection statistics with the derived scoring quantities populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizedStatistics {
    pub num_documents: u64,
    pub avgdl: f64,
    pub mavgtf: f64,
    /// `1 - 1/mavgtf`, the verboseness-fission mixing weight. Precomputed
    /// here because it is constant across the whole run.
    pub b_va: f64,
}

impl CollectionStatistics {
    /// Fold another accumulator into this one (segment layout's per-file
    /// map results are combined this way).
    pub fn absorb(&mut self, other: &CollectionStatistics) {
        self.num_documents += other.num_documents;
        self.total_doc_length += other.total_doc_length;
        self.sum_avgtf += other.sum_avgtf;
    }

    /// Derive the scoring quantities. An empty collection finalises to
    /// zeros; nothing can be scored against it anyway since no posting
    /// exists.
    pub fn finalize(&self) -> FinalizedStatistics {
        if self.num_documents == 0 {
            return FinalizedStatistics {
                num_documents: 0,
                avgdl: 0.0,
                mavgtf: 0.0,
                b_va: 0.0,
            };
        }

        let n = self.num_documents as f64;
        let mavgtf = self.sum_avgtf / n;
        FinalizedStatistics {
            num_documents: self.num_documents,
            avgdl: self.total_doc_length as f64 / n,
            mavgtf,
            b_va: 1.0 - 1.0 / mavgtf,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        encode_varint(self.num_documents, &mut buf);
        encode_varint(self.total_doc_length, &mut buf);
        encode_f64(self.sum_avgtf, &mut buf);
        write_envelope(path, &buf)
    }

    pub fn load(path: &Path) -> Result<CollectionStatistics> {
        let payload = read_envelope(path)?;
        let wrap = |e| codec_error(path, e);

        let (num_documents, mut pos) = decode_varint(&payload).map_err(wrap)?;
        let (total_doc_length, consumed) = decode_varint(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (sum_avgtf, _) = decode_f64(&payload[pos..]).map_err(wrap)?;

        Ok(CollectionStatistics {
            num_documents,
            total_doc_length,
            sum_avgtf,
        })
    }
}

// ============================================================================
// INGESTION VISITORS
// ============================================================================

/// Ingestion state for the dense layouts (simple, SPIMI): doc ids are
/// assigned densely from 0 in ingestion order, and a DocId -> DocNo mapping
/// is kept alongside.
#[derive(Debug, Default)]
pub struct DenseCorpus {
    /// Indexed by doc id.
    pub doc_stats: Vec<DocumentStats>,
    /// Indexed by doc id.
    pub doc_map: Vec<String>,
    pub stats: CollectionStatistics,
}

impl DenseCorpus {
    /// Tokenise one document, streaming `(docid, term)` pairs into `sink`.
    ///
    /// The doc id is tentative while tokens flow: documents that produce no
    /// tokens publish nothing, contribute nothing, and their id is reused by
    /// the next document.
    pub fn visit(
        &mut self,
        docno: &str,
        text: &str,
        analyzer: &Analyzer,
        sink: &mut dyn FnMut(u32, String) -> Result<()>,
    ) -> Result<()> {
        let docid = self.doc_map.len() as u32;
        let mut dl = 0u32;
        let mut unique: HashSet<String> = HashSet::new();

        for term in analyzer.tokenize(text) {
            dl += 1;
            if !unique.contains(&term) {
                unique.insert(term.clone());
            }
            sink(docid, term)?;
        }

        if !unique.is_empty() {
            let avgtf = f64::from(dl) / unique.len() as f64;
            self.doc_stats.push(DocumentStats { dl, avgtf });
            self.doc_map.push(docno.to_string());
            self.stats.num_documents += 1;
            self.stats.total_doc_length += u64::from(dl);
            self.stats.sum_avgtf += avgtf;
        }

        Ok(())
    }
}

/// Ingestion state for the segment layout, which uses the document number
/// directly as the document id (no numeric mapping).
#[derive(Debug, Default)]
pub struct DocnoCorpus {
    pub doc_stats: HashMap<String, DocumentStats>,
    pub stats: CollectionStatistics,
}

impl DocnoCorpus {
    /// Tokenise one document, streaming `(docno, term)` pairs into `sink`.
    pub fn visit(
        &mut self,
        docno: &str,
        text: &str,
        analyzer: &Analyzer,
        sink: &mut dyn FnMut(&str, String) -> Result<()>,
    ) -> Result<()> {
        let mut dl = 0u32;
        let mut unique: HashSet<String> = HashSet::new();

        for term in analyzer.tokenize(text) {
            dl += 1;
            if !unique.contains(&term) {
                unique.insert(term.clone());
            }
            sink(docno, term)?;
        }

        if !unique.is_empty() {
            let avgtf = f64::from(dl) / unique.len() as f64;
            self.doc_stats
                .insert(docno.to_string(), DocumentStats { dl, avgtf });
            self.stats.num_documents += 1;
            self.stats.total_doc_length += u64::from(dl);
            self.stats.sum_avgtf += avgtf;
        }

        Ok(())
    }

    /// Fold another corpus (one input file's map result) into this one.
    pub fn absorb(&mut self, other: DocnoCorpus) {
        self.doc_stats.extend(other.doc_stats);
        self.stats.absorb(&other.stats);
    }
}

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Save doc-id-indexed document statistics (simple and SPIMI layouts).
pub fn save_dense_doc_stats(doc_stats: &[DocumentStats], path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    encode_varint(doc_stats.len() as u64, &mut buf);
    for stats in doc_stats {
        encode_varint(u64::from(stats.dl), &mut buf);
        encode_f64(stats.avgtf, &mut buf);
    }
    write_envelope(path, &buf)
}

pub fn load_dense_doc_stats(path: &Path) -> Result<Vec<DocumentStats>> {
    let payload = read_envelope(path)?;
    let wrap = |e| codec_error(path, e);

    let (count, mut pos) = decode_varint(&payload).map_err(wrap)?;
    let mut doc_stats = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (dl, consumed) = decode_varint(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (avgtf, consumed) = decode_f64(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        doc_stats.push(DocumentStats {
            dl: dl as u32,
            avgtf,
        });
    }
    Ok(doc_stats)
}

/// Save docno-keyed document statistics (segment layout). Entries are
/// written in sorted key order so the artifact is deterministic.
pub fn save_docno_doc_stats(doc_stats: &HashMap<String, DocumentStats>, path: &Path) -> Result<()> {
    let mut entries: Vec<_> = doc_stats.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut buf = Vec::new();
    encode_varint(entries.len() as u64, &mut buf);
    for (docno, stats) in entries {
        encode_string(docno, &mut buf);
        encode_varint(u64::from(stats.dl), &mut buf);
        encode_f64(stats.avgtf, &mut buf);
    }
    write_envelope(path, &buf)
}

pub fn load_docno_doc_stats(path: &Path) -> Result<HashMap<String, DocumentStats>> {
    let payload = read_envelope(path)?;
    let wrap = |e| codec_error(path, e);

    let (count, mut pos) = decode_varint(&payload).map_err(wrap)?;
    let mut doc_stats = HashMap::with_capacity(count as usize);
    for _ in 0..count {
        let (docno, consumed) = decode_string(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (dl, consumed) = decode_varint(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (avgtf, consumed) = decode_f64(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        doc_stats.insert(
            docno,
            DocumentStats {
                dl: dl as u32,
                avgtf,
            },
        );
    }
    Ok(doc_stats)
}

/// Save the DocId -> DocNo mapping, dense in doc-id order.
pub fn save_doc_map(doc_map: &[String], path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    encode_varint(doc_map.len() as u64, &mut buf);
    for docno in doc_map {
        encode_string(docno, &mut buf);
    }
    write_envelope(path, &buf)
}

pub fn load_doc_map(path: &Path) -> Result<Vec<String>> {
    let payload = read_envelope(path)?;
    let wrap = |e| codec_error(path, e);

    let (count, mut pos) = decode_varint(&payload).map_err(wrap)?;
    let mut doc_map = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (docno, consumed) = decode_string(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        doc_map.push(docno);
    }
    Ok(doc_map)
}
