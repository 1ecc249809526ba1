// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The indexing pipeline: expand inputs, clear the target directory, build
//! the chosen layout, persist the ancillary files.
//!
//! Indexing is one-shot. The directory is wiped before anything is written,
//! which is also what makes retries safe after a crash: partial artifacts
//! from an aborted run never survive into the next one. Progress bars go to
//! stderr so they can't contaminate piped output, and indicatif hides them
//! when stderr is not a terminal.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::analyze::Analyzer;
use crate::corpus::{expand_patterns, read_documents};
use crate::error::Result;
use crate::index::save_simple;
use crate::invert::invert;
use crate::paths::IndexPaths;
use crate::segments::build_segments;
use crate::settings::{IndexingMethod, Settings};
use crate::spimi::{merge_blocks, BlockWriter};
use crate::stats::{
    save_dense_doc_stats, save_doc_map, save_docno_doc_stats, CollectionStatistics, DenseCorpus,
};

/// Everything `run_index` needs, assembled by the CLI layer.
pub struct IndexParams {
    pub patterns: Vec<String>,
    pub settings: Settings,
    pub block_size: usize,
    pub index_dir: PathBuf,
}

/// What a build produced, for the final summary line.
pub struct IndexSummary {
    pub files: usize,
    pub documents: u64,
    pub terms: usize,
    pub method: IndexingMethod,
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .expect("static template")
        .progress_chars("━━╸")
}

fn file_progress(len: usize, prefix: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(progress_style());
    bar.set_prefix(prefix);
    bar
}

/// Build an index directory from scratch.
pub fn run_index(params: &IndexParams) -> Result<IndexSummary> {
    let analyzer = Analyzer::new(&params.settings);
    let paths = IndexPaths::new(&params.index_dir);

    let files = expand_patterns(&params.patterns)?;
    paths.clear()?;

    let (stats, documents, terms) = match params.settings.indexing_method {
        IndexingMethod::Simple => {
            let (corpus, terms) = build_simple(&files, &analyzer, &paths)?;
            save_doc_map(&corpus.doc_map, &paths.doc_map())?;
            save_dense_doc_stats(&corpus.doc_stats, &paths.doc_stats())?;
            (corpus.stats, corpus.stats.num_documents, terms)
        }
        IndexingMethod::Spimi => {
            let (corpus, terms) = build_spimi(&files, &analyzer, &paths, params.block_size)?;
            save_doc_map(&corpus.doc_map, &paths.doc_map())?;
            save_dense_doc_stats(&corpus.doc_stats, &paths.doc_stats())?;
            (corpus.stats, corpus.stats.num_documents, terms)
        }
        IndexingMethod::MapReduce => {
            let bar = file_progress(files.len(), "Mapping");
            let build = build_segments(&files, &analyzer, &paths, |file| {
                bar.set_message(file.display().to_string());
                bar.inc(1);
            })?;
            bar.finish_with_message("done");

            save_docno_doc_stats(&build.corpus.doc_stats, &paths.doc_stats())?;
            (
                build.corpus.stats,
                build.corpus.stats.num_documents,
                build.num_terms,
            )
        }
    };

    stats.save(&paths.collection_stats())?;
    params.settings.save(&paths)?;

    Ok(IndexSummary {
        files: files.len(),
        documents,
        terms,
        method: params.settings.indexing_method,
    })
}

/// Simple layout: collect every `(docid, term)` pair, invert once, write one
/// file. Fine as long as the collection fits in memory.
fn build_simple(
    files: &[PathBuf],
    analyzer: &Analyzer,
    paths: &IndexPaths,
) -> Result<(DenseCorpus, usize)> {
    let bar = file_progress(files.len(), "Parsing");

    let mut corpus = DenseCorpus::default();
    let mut pairs: Vec<(u32, String)> = Vec::new();
    for file in files {
        bar.set_message(file.display().to_string());
        for (docno, text) in read_documents(file)? {
            corpus.visit(&docno, &text, analyzer, &mut |docid, term| {
                pairs.push((docid, term));
                Ok(())
            })?;
        }
        bar.inc(1);
    }
    bar.finish_with_message("done");

    let index = invert(pairs);
    let terms = index.len();
    save_simple(&index, &paths.simple_index())?;
    Ok((corpus, terms))
}

/// SPIMI layout: stream pairs into the block writer, then k-way merge the
/// spilled runs. The only builder that copes with collections larger than
/// memory.
fn build_spimi(
    files: &[PathBuf],
    analyzer: &Analyzer,
    paths: &IndexPaths,
    block_size: usize,
) -> Result<(DenseCorpus, usize)> {
    let bar = file_progress(files.len(), "Parsing");

    let mut corpus = DenseCorpus::default();
    let mut writer = BlockWriter::new(paths, block_size);
    for file in files {
        bar.set_message(file.display().to_string());
        for (docno, text) in read_documents(file)? {
            corpus.visit(&docno, &text, analyzer, &mut |docid, term| {
                writer.push(docid, term)
            })?;
        }
        bar.inc(1);
    }
    bar.finish_with_message("done");

    let summary = writer.finish()?;

    let merge_bar = ProgressBar::new(summary.num_terms as u64);
    merge_bar.set_style(progress_style());
    merge_bar.set_prefix("Merging");
    merge_bar.set_message(format!("{} blocks", summary.num_blocks));
    let terms = merge_blocks(paths, summary, || merge_bar.inc(1))?;
    merge_bar.finish_with_message("done");

    Ok((corpus, terms))
}
