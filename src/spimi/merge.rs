// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! SPIMI merge phase: k-way merge of sorted run files into one term-sorted
//! posting file plus a term -> byte-offset meta-index.
//!
//! A min-heap keyed by `(term, block)` holds one cursor per non-exhausted
//! run file. Each round pops every cursor carrying the minimum term, merges
//! their posting lists (same docid in two runs means the same document
//! crossed a block boundary, so the term frequencies are summed), records
//! the output offset for the term, writes the line, and refills the consumed
//! cursors. Run files are deleted once the merge succeeds.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::binary::{
    codec_error, decode_string, decode_varint, encode_string, encode_varint, read_envelope,
    write_envelope,
};
use crate::error::{Error, Result};
use crate::paths::IndexPaths;

use super::blocks::{parse_posting_line, posting_line, BlockSummary};

/// One run file's current record. Ordered by `(term, block)` so the heap
/// pops equal terms in block order.
#[derive(Debug, PartialEq, Eq)]
struct Cursor {
    term: String,
    postings: Vec<(u32, u32)>,
    block: usize,
}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.term, self.block).cmp(&(&other.term, other.block))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Merge all run files into the final posting file and meta-index.
/// Returns the number of distinct terms written.
pub fn merge_blocks(
    paths: &IndexPaths,
    summary: BlockSummary,
    mut on_term: impl FnMut(),
) -> Result<usize> {
    let mut readers = Vec::with_capacity(summary.num_blocks);
    for blockno in 1..=summary.num_blocks {
        let path = paths.spimi_block(blockno);
        let file = File::open(&path).map_err(|e| Error::io(&path, e))?;
        readers.push(BufReader::new(file));
    }

    let mut heap: BinaryHeap<Reverse<Cursor>> = BinaryHeap::with_capacity(readers.len());
    for block in 0..readers.len() {
        if let Some(cursor) = next_cursor(paths, &mut readers, block)? {
            heap.push(Reverse(cursor));
        }
    }

    let out_path = paths.spimi_index();
    let out_file = File::create(&out_path).map_err(|e| Error::io(&out_path, e))?;
    let mut out = BufWriter::new(out_file);
    let mut offset: u64 = 0;
    // Built in term order, which is exactly how it is persisted.
    let mut meta_index: Vec<(String, u64)> = Vec::new();

    while let Some(Reverse(first)) = heap.pop() {
        let term = first.term;
        let mut lists = vec![first.postings];
        let mut consumed = vec![first.block];

        while heap
            .peek()
            .is_some_and(|Reverse(cursor)| cursor.term == term)
        {
            let Reverse(cursor) = heap.pop().expect("peeked cursor");
            lists.push(cursor.postings);
            consumed.push(cursor.block);
        }

        let merged = merge_postings(lists);
        meta_index.push((term.clone(), offset));

        let line = posting_line(&term, &merged);
        out.write_all(line.as_bytes())
            .map_err(|e| Error::io(&out_path, e))?;
        offset += line.len() as u64;

        for block in consumed {
            if let Some(cursor) = next_cursor(paths, &mut readers, block)? {
                heap.push(Reverse(cursor));
            }
        }
        on_term();
    }

    out.flush().map_err(|e| Error::io(&out_path, e))?;

    let num_terms = meta_index.len();
    save_meta_index(&meta_index, paths)?;

    drop(readers);
    for blockno in 1..=summary.num_blocks {
        let path = paths.spimi_block(blockno);
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
    }

    Ok(num_terms)
}

/// Advance one run file's cursor. `None` means the file is exhausted.
fn next_cursor(
    paths: &IndexPaths,
    readers: &mut [BufReader<File>],
    block: usize,
) -> Result<Option<Cursor>> {
    let path = paths.spimi_block(block + 1);
    let mut line = String::new();
    let read = readers[block]
        .read_line(&mut line)
        .map_err(|e| Error::io(&path, e))?;
    if read == 0 {
        return Ok(None);
    }

    match parse_posting_line(&line) {
        Some((term, postings)) => Ok(Some(Cursor {
            term,
            postings,
            block,
        })),
        None => Err(Error::corrupt(
            &path,
            format!("unparsable posting line: {:?}", line.trim_end()),
        )),
    }
}

/// Merge docid-sorted posting lists into one, summing term frequencies on
/// equal doc ids. Output is strictly docid-ascending.
pub fn merge_postings(lists: Vec<Vec<(u32, u32)>>) -> Vec<(u32, u32)> {
    if lists.len() == 1 {
        return lists.into_iter().next().expect("single list");
    }

    let mut all: Vec<(u32, u32)> = lists.concat();
    all.sort_unstable_by_key(|&(docid, _)| docid);

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(all.len());
    for (docid, tf) in all {
        match merged.last_mut() {
            Some(last) if last.0 == docid => last.1 += tf,
            _ => merged.push((docid, tf)),
        }
    }
    merged
}

// ============================================================================
// META-INDEX PERSISTENCE
// ============================================================================

fn save_meta_index(meta_index: &[(String, u64)], paths: &IndexPaths) -> Result<()> {
    let mut buf = Vec::new();
    encode_varint(meta_index.len() as u64, &mut buf);
    for (term, offset) in meta_index {
        encode_string(term, &mut buf);
        encode_varint(*offset, &mut buf);
    }
    write_envelope(&paths.spimi_meta(), &buf)
}

/// Load the term -> byte-offset meta-index, in file order (term-ascending).
pub fn load_meta_index(paths: &IndexPaths) -> Result<Vec<(String, u64)>> {
    let path = paths.spimi_meta();
    let payload = read_envelope(&path)?;
    let wrap = |e| codec_error(&path, e);

    let (count, mut pos) = decode_varint(&payload).map_err(wrap)?;
    let mut meta_index = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (term, consumed) = decode_string(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        let (offset, consumed) = decode_varint(&payload[pos..]).map_err(wrap)?;
        pos += consumed;
        meta_index.push((term, offset));
    }
    Ok(meta_index)
}
