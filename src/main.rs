// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Quarry CLI: build, search, and inspect inverted indexes.
//!
//! ```bash
//! # Build a SPIMI index over a collection directory
//! quarry index ./collection --indexing-method spimi --case-folding --stop-words
//!
//! # Rank the TREC-8 adhoc topics with BM25 and write a run file
//! quarry search -t topicsTREC8Adhoc.txt --run-name myrun bm25 > myrun.txt
//!
//! # Examine what a build wrote
//! quarry inspect
//! ```

use std::io::Write;
use std::path::Path;
use std::process;

use clap::Parser;

use quarry::cli::display::{format_size, heading, row, styled, CYAN, GREEN};
use quarry::cli::{Cli, Commands};
use quarry::error::{Error, Result};
use quarry::paths::IndexPaths;
use quarry::score::ScoringFunction;
use quarry::settings::Settings;
use quarry::stats::CollectionStatistics;
use quarry::{run_index, run_search, IndexParams, SearchParams};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index {
            patterns,
            case_folding,
            stop_words,
            stemming,
            lemmatization,
            indexing_method,
            block_size,
            index_dir,
        } => run_index(&IndexParams {
            patterns,
            settings: Settings {
                case_folding,
                stop_words,
                stemming,
                lemmatization,
                indexing_method,
            },
            block_size: block_size as usize,
            index_dir,
        })
        .map(print_index_summary),
        Commands::Search {
            topics_file,
            show,
            run_name,
            topic,
            debug,
            index_dir,
            scoring,
        } => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run_search(
                &SearchParams {
                    topics_file,
                    show,
                    run_name,
                    topic,
                    debug,
                    index_dir,
                    scoring: ScoringFunction::from(&scoring),
                },
                &mut out,
            )
            .and_then(|()| out.flush().map_err(|e| Error::io("<output>", e)))
        }
        Commands::Inspect { index_dir } => inspect(&index_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(e.exit_code());
    }
}

fn print_index_summary(summary: quarry::IndexSummary) {
    eprintln!();
    eprintln!(
        "{} {}",
        styled(GREEN, "✓"),
        heading("Indexing complete")
    );
    eprintln!("{}", row("method", summary.method.as_str()));
    eprintln!("{}", row("files", summary.files));
    eprintln!("{}", row("documents", summary.documents));
    eprintln!("{}", row("terms", summary.terms));
}

/// Show what a completed build left in the index directory.
fn inspect(index_dir: &Path) -> Result<()> {
    let paths = IndexPaths::new(index_dir);
    let settings = Settings::load(&paths)?;
    let stats = CollectionStatistics::load(&paths.collection_stats())?;
    let finalized = stats.finalize();

    println!("{}", heading(&format!("Index {}", index_dir.display())));
    println!();
    println!("{}", row("method", settings.indexing_method.as_str()));
    println!("{}", row("case folding", settings.case_folding));
    println!("{}", row("stop words", settings.stop_words));
    println!("{}", row("stemming", settings.stemming));
    println!("{}", row("lemmatization", settings.lemmatization));
    println!();
    println!("{}", row("documents", stats.num_documents));
    println!("{}", row("total dl", stats.total_doc_length));
    println!("{}", row("avgdl", format!("{:.3}", finalized.avgdl)));
    println!("{}", row("mavgtf", format!("{:.3}", finalized.mavgtf)));
    println!();
    println!("{}", heading("Files"));

    let mut entries: Vec<_> = std::fs::read_dir(index_dir)
        .map_err(|e| Error::io(index_dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| Error::io(index_dir, e))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let metadata = entry.metadata().map_err(|e| Error::io(entry.path(), e))?;
        if metadata.is_file() {
            println!(
                "  {:<24} {}",
                styled(CYAN, &entry.file_name().to_string_lossy()),
                format_size(metadata.len())
            );
        }
    }

    Ok(())
}
