// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted-index builder and ranked retrieval engine.
//!
//! Quarry ingests TREC-style document collections (tagged markup or JSON
//! record lists), builds an inverted index in one of three on-disk layouts,
//! and answers free-text topics with TF-IDF, BM25, or BM25VA ranking.
//!
//! # Architecture
//!
//! ```text
//!               indexing                              search
//!
//! collection ──▶ corpus ──▶ analyze ──▶ stats ──┐   topics ──▶ analyze
//!   files       (docno,     (terms)    (dl,     │                │
//!               text)                  avgtf)   │                ▼
//!                                               ├──▶ invert    index loader
//!                                               │    (batch)     │
//!                          ┌────────────────────┘       │        ▼
//!                          ▼                            ▼      score ──▶ ranked
//!               simple │ segments │ spimi ──────▶ on-disk layout          run
//!                      │ (7 bins) │ (blocks + k-way merge)
//! ```
//!
//! The three layouts share one logical posting contract — `term` maps to a
//! docid-ascending list of `(doc, tf)` pairs — so the scorer consumes any of
//! them through [`index::LoadedIndex`]. Only SPIMI copes with collections
//! larger than memory: it spills term-sorted run files and merges them
//! externally, recording a byte offset per term so queries seek instead of
//! scanning.

pub mod analyze;
pub mod binary;
pub mod build;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod index;
pub mod invert;
pub mod paths;
pub mod score;
pub mod search;
pub mod segments;
pub mod settings;
pub mod spimi;
pub mod stats;
pub mod topics;

pub use analyze::Analyzer;
pub use build::{run_index, IndexParams, IndexSummary};
pub use error::{Error, Result};
pub use index::{load_for_terms, LoadedIndex};
pub use invert::invert;
pub use paths::IndexPaths;
pub use score::{rank_topic, ScoringFunction, DEFAULT_B, DEFAULT_K1, DEFAULT_SHOW};
pub use search::{run_search, SearchParams};
pub use segments::{segment_key, SEGMENT_KEYS};
pub use settings::{IndexingMethod, Settings};
pub use spimi::DEFAULT_BLOCK_SIZE;
pub use stats::{CollectionStatistics, DocumentStats, FinalizedStatistics};
pub use topics::{parse_topics, Topic};
