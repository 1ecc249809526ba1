// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search pipeline: reload the build configuration, parse topics, load
//! exactly the postings the topics need, score, and emit ranked lines.
//!
//! Query tokens must be processed with the same analyzer configuration the
//! index was built with, so the persisted settings are loaded first and the
//! requested tokeniser flags come from there, never from the command line.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use crate::analyze::Analyzer;
use crate::cli::display::{row, styled, DIM};
use crate::error::{Error, Result};
use crate::index::{load_for_terms, LoadedIndex};
use crate::paths::IndexPaths;
use crate::score::{output_line, rank_topic, ScoringFunction};
use crate::settings::Settings;
use crate::stats::{load_dense_doc_stats, load_doc_map, load_docno_doc_stats, CollectionStatistics};
use crate::topics::parse_topics;

/// Everything `run_search` needs, assembled by the CLI layer.
pub struct SearchParams {
    pub topics_file: PathBuf,
    pub show: usize,
    pub run_name: String,
    pub topic: Option<u32>,
    pub debug: bool,
    pub index_dir: PathBuf,
    pub scoring: ScoringFunction,
}

/// Run every topic against the index, writing ranked lines to `out`.
pub fn run_search(params: &SearchParams, out: &mut dyn Write) -> Result<()> {
    let paths = IndexPaths::new(&params.index_dir);
    let settings = Settings::load(&paths)?;
    let analyzer = Analyzer::new(&settings);

    let mut topics = parse_topics(&params.topics_file, &analyzer)?;
    if let Some(id) = params.topic {
        topics.retain(|topic| topic.id == id);
        if topics.is_empty() {
            return Err(Error::TopicNotFound { topic: id });
        }
    }

    let stats = CollectionStatistics::load(&paths.collection_stats())?.finalize();

    let query_terms: BTreeSet<String> = topics
        .iter()
        .flat_map(|topic| topic.terms.iter().cloned())
        .collect();
    let index = load_for_terms(&paths, settings.indexing_method, &query_terms)?;

    if params.debug {
        eprintln!("{}", row("scoring", params.scoring.name()));
        eprintln!("{}", row("method", settings.indexing_method.as_str()));
        eprintln!("{}", row("topics", topics.len()));
        eprintln!("{}", row("query terms", query_terms.len()));
        eprintln!(
            "{}",
            row(
                "loaded",
                format!(
                    "{} {}",
                    index.num_terms(),
                    styled(DIM, "terms with postings")
                )
            )
        );
    }

    let emit = |out: &mut dyn Write, line: String| -> Result<()> {
        writeln!(out, "{}", line).map_err(|e| Error::io("<output>", e))
    };

    match &index {
        LoadedIndex::Dense(postings) => {
            let doc_stats = load_dense_doc_stats(&paths.doc_stats())?;
            let doc_map = load_doc_map(&paths.doc_map())?;

            for topic in &topics {
                let ranked = rank_topic(
                    &topic.terms,
                    postings,
                    |docid| doc_stats.get(*docid as usize).copied(),
                    &stats,
                    &params.scoring,
                    params.show,
                )?;
                for (rank, (docid, score)) in ranked.iter().enumerate() {
                    let docno = doc_map.get(*docid as usize).ok_or_else(|| {
                        Error::corrupt(
                            paths.doc_map(),
                            format!("doc id {} outside the DocId -> DocNo mapping", docid),
                        )
                    })?;
                    emit(
                        out,
                        output_line(topic.id, docno, rank, *score, &params.run_name),
                    )?;
                }
            }
        }
        LoadedIndex::ByDocno(postings) => {
            let doc_stats = load_docno_doc_stats(&paths.doc_stats())?;

            for topic in &topics {
                let ranked = rank_topic(
                    &topic.terms,
                    postings,
                    |docno| doc_stats.get(docno).copied(),
                    &stats,
                    &params.scoring,
                    params.show,
                )?;
                for (rank, (docno, score)) in ranked.iter().enumerate() {
                    emit(
                        out,
                        output_line(topic.id, docno, rank, *score, &params.run_name),
                    )?;
                }
            }
        }
    }

    Ok(())
}
