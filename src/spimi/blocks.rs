// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! SPIMI block phase: chunk the token stream, invert each chunk in memory,
//! spill it to disk as a term-sorted run file.
//!
//! Run files are plain text, one line per term:
//!
//! ```text
//! TERM ":" DOCID "-" TF ("," DOCID "-" TF)* "\n"
//! ```
//!
//! The tokeniser cannot produce a colon, so the first colon always ends the
//! term. Line length is unbounded. A line that does not parse indicates a
//! corrupt run file and is fatal.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::{Error, Result};
use crate::invert::invert;
use crate::paths::IndexPaths;

/// Token pairs per block. The default bounds peak memory at a few gigabytes
/// and produces run files around 50 MiB on a typical news collection.
pub const DEFAULT_BLOCK_SIZE: usize = 10_000_000;

/// Render one posting line. `postings` must be docid-ascending.
pub fn posting_line(term: &str, postings: &[(u32, u32)]) -> String {
    let mut line = String::with_capacity(term.len() + 1 + postings.len() * 8);
    line.push_str(term);
    line.push(':');
    for (i, (docid, tf)) in postings.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        // Writing integers to a String cannot fail.
        let _ = write!(line, "{}-{}", docid, tf);
    }
    line.push('\n');
    line
}

/// Parse one posting line. Returns `None` on any malformed input; the
/// caller turns that into a corruption error naming the file.
pub fn parse_posting_line(line: &str) -> Option<(String, Vec<(u32, u32)>)> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let (term, rest) = line.split_once(':')?;
    if term.is_empty() || rest.is_empty() {
        return None;
    }

    let mut postings = Vec::new();
    for pair in rest.split(',') {
        let (docid, tf) = pair.split_once('-')?;
        postings.push((docid.parse().ok()?, tf.parse().ok()?));
    }
    Some((term.to_string(), postings))
}

/// Counts produced by the block phase, consumed by the merge phase.
#[derive(Debug, Clone, Copy)]
pub struct BlockSummary {
    pub num_blocks: usize,
    /// Sum of per-block term counts (an upper bound on merged terms, used
    /// for progress reporting).
    pub num_terms: usize,
}

/// Accumulates `(docid, term)` pairs and spills a sorted run file whenever
/// the block fills up. This is the sink driven by the ingestion visitor.
pub struct BlockWriter<'a> {
    paths: &'a IndexPaths,
    block_size: usize,
    pending: Vec<(u32, String)>,
    num_blocks: usize,
    num_terms: usize,
}

impl<'a> BlockWriter<'a> {
    pub fn new(paths: &'a IndexPaths, block_size: usize) -> BlockWriter<'a> {
        assert!(block_size > 0, "block size must be positive");
        BlockWriter {
            paths,
            block_size,
            pending: Vec::new(),
            num_blocks: 0,
            num_terms: 0,
        }
    }

    pub fn push(&mut self, docid: u32, term: String) -> Result<()> {
        self.pending.push((docid, term));
        if self.pending.len() >= self.block_size {
            self.spill()?;
        }
        Ok(())
    }

    /// Spill the pending block, then flush any partial block and return the
    /// run-file summary.
    pub fn finish(mut self) -> Result<BlockSummary> {
        if !self.pending.is_empty() {
            self.spill()?;
        }
        Ok(BlockSummary {
            num_blocks: self.num_blocks,
            num_terms: self.num_terms,
        })
    }

    fn spill(&mut self) -> Result<()> {
        let index = invert(self.pending.drain(..));
        let mut entries: Vec<(String, Vec<(u32, u32)>)> = index.into_iter().collect();
        // Byte-wise term order, the same order the merge phase emits.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        self.num_blocks += 1;
        let path = self.paths.spimi_block(self.num_blocks);
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        for (term, postings) in &entries {
            writer
                .write_all(posting_line(term, postings).as_bytes())
                .map_err(|e| Error::io(&path, e))?;
        }
        writer.flush().map_err(|e| Error::io(&path, e))?;

        self.num_terms += entries.len();
        Ok(())
    }
}
