// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the quarry command-line interface.
//!
//! Three subcommands: `index` to build an index directory from collection
//! files, `search` to rank documents against a topic file (with the
//! retrieval model as a nested subcommand), and `inspect` to examine what a
//! build left behind.
//!
//! ```bash
//! # Build a SPIMI index with case folding and stemming
//! quarry index ./collection --indexing-method spimi --case-folding --stemming
//!
//! # Rank the TREC-8 adhoc topics with BM25
//! quarry search -t topics.txt --run-name myrun bm25 --b 0.25 --k1 1.5
//!
//! # What did the build write?
//! quarry inspect
//! ```

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::score::{ScoringFunction, DEFAULT_B, DEFAULT_K1, DEFAULT_SHOW};
use crate::settings::IndexingMethod;
use crate::spimi::DEFAULT_BLOCK_SIZE;

#[derive(Parser)]
#[command(
    name = "quarry",
    about = "Inverted-index builder and ranked retrieval engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index over a document collection
    Index {
        /// Collection files, directories (recursed), or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Map every token to lower case
        #[arg(long)]
        case_folding: bool,

        /// Drop stop words (before stemming/lemmatization)
        #[arg(long)]
        stop_words: bool,

        /// Apply the Porter stemmer
        #[arg(long, conflicts_with = "lemmatization")]
        stemming: bool,

        /// Apply a WordNet-style lemmatizer
        #[arg(long)]
        lemmatization: bool,

        /// Index layout to build
        #[arg(long, value_enum)]
        indexing_method: IndexingMethod,

        /// Token pairs per SPIMI block spilled to disk
        #[arg(
            long,
            default_value_t = DEFAULT_BLOCK_SIZE as u64,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        block_size: u64,

        /// Directory the index is written to (cleared first)
        #[arg(long, default_value = "indexed_data")]
        index_dir: PathBuf,
    },

    /// Rank documents against the topics in a topic file
    Search {
        /// The topic file containing the queries
        #[arg(short = 't', long)]
        topics_file: PathBuf,

        /// Number of results per topic
        #[arg(long, default_value_t = DEFAULT_SHOW)]
        show: usize,

        /// Run tag written into every output line
        #[arg(long, default_value = "quarry")]
        run_name: String,

        /// Restrict the run to a single topic id
        #[arg(long)]
        topic: Option<u32>,

        /// Print per-topic diagnostics to stderr
        #[arg(short = 'd', long)]
        debug: bool,

        /// Directory the index was written to
        #[arg(long, default_value = "indexed_data")]
        index_dir: PathBuf,

        #[command(subcommand)]
        scoring: ScoringCommand,
    },

    /// Show the settings, statistics, and files of an index directory
    Inspect {
        /// Directory the index was written to
        #[arg(long, default_value = "indexed_data")]
        index_dir: PathBuf,
    },
}

/// Retrieval model selection, one subcommand per scoring function.
#[derive(Subcommand)]
pub enum ScoringCommand {
    /// Log-scaled term frequency times inverse document frequency
    TfIdf,
    /// Okapi BM25
    Bm25 {
        /// Document-length normalisation strength
        #[arg(long, default_value_t = DEFAULT_B)]
        b: f64,
        /// Term-frequency saturation
        #[arg(long, default_value_t = DEFAULT_K1)]
        k1: f64,
    },
    /// BM25 with verboseness-fission length normalisation
    Bm25va {
        /// Term-frequency saturation
        #[arg(long, default_value_t = DEFAULT_K1)]
        k1: f64,
    },
}

impl From<&ScoringCommand> for ScoringFunction {
    fn from(command: &ScoringCommand) -> ScoringFunction {
        match *command {
            ScoringCommand::TfIdf => ScoringFunction::TfIdf,
            ScoringCommand::Bm25 { b, k1 } => ScoringFunction::Bm25 { b, k1 },
            ScoringCommand::Bm25va { k1 } => ScoringFunction::Bm25Va { k1 },
        }
    }
}
