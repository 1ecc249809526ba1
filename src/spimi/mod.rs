// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Single-pass in-memory indexing with external merge.
//!
//! The only index builder here that copes with collections larger than
//! memory. Two phases:
//!
//! 1. **Block phase** ([`blocks`]): the token stream is chunked into blocks
//!    of at most `block_size` `(docid, term)` pairs; each block is inverted
//!    in memory and spilled to disk as a term-sorted run file.
//! 2. **Merge phase** ([`merge`]): the run files are k-way merged into a
//!    single term-sorted posting file, aggregating posting lists for terms
//!    that span blocks, while a term -> byte-offset meta-index is recorded
//!    so the loader can seek straight to any term's line.

pub mod blocks;
pub mod merge;

pub use blocks::{
    parse_posting_line, posting_line, BlockSummary, BlockWriter, DEFAULT_BLOCK_SIZE,
};
pub use merge::{load_meta_index, merge_blocks, merge_postings};
