//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use quarry::settings::{IndexingMethod, Settings};
use quarry::{run_index, Analyzer, IndexParams, DEFAULT_BLOCK_SIZE};

/// The three-document collection used by the end-to-end scenarios.
pub const D1: &str = "the quick brown fox";
pub const D2: &str = "the quick brown fox jumps over the lazy dog";
pub const D3: &str = "lazy lazy dog";

/// Case folding on, everything else off.
pub fn fold_settings(method: IndexingMethod) -> Settings {
    Settings {
        case_folding: true,
        stop_words: false,
        stemming: false,
        lemmatization: false,
        indexing_method: method,
    }
}

pub fn fold_analyzer() -> Analyzer {
    Analyzer::new(&fold_settings(IndexingMethod::Simple))
}

/// Write the three-document collection as one markup file.
pub fn write_fox_collection(dir: &Path) -> PathBuf {
    write_markup(
        dir,
        "collection.trec",
        &[("D1", D1), ("D2", D2), ("D3", D3)],
    )
}

/// Write `(docno, text)` pairs as a markup collection file.
pub fn write_markup(dir: &Path, name: &str, docs: &[(&str, &str)]) -> PathBuf {
    let mut content = String::new();
    for (docno, text) in docs {
        content.push_str(&format!(
            "<DOC>\n<DOCNO> {} </DOCNO>\n<TEXT>{}</TEXT>\n</DOC>\n",
            docno, text
        ));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Write a topic file with `(id, title)` entries.
pub fn write_topics(dir: &Path, topics: &[(u32, &str)]) -> PathBuf {
    let mut content = String::new();
    for (id, title) in topics {
        content.push_str(&format!(
            "<top>\n<num> Number: {}\n<title> {}\n</top>\n",
            id, title
        ));
    }
    let path = dir.join("topics.txt");
    fs::write(&path, content).unwrap();
    path
}

/// Index the fox collection into `index_dir` with the given method.
pub fn index_fox_collection(work: &Path, index_dir: &Path, method: IndexingMethod) {
    index_fox_collection_with_block_size(work, index_dir, method, DEFAULT_BLOCK_SIZE);
}

pub fn index_fox_collection_with_block_size(
    work: &Path,
    index_dir: &Path,
    method: IndexingMethod,
    block_size: usize,
) {
    let collection = write_fox_collection(work);
    run_index(&IndexParams {
        patterns: vec![collection.to_string_lossy().into_owned()],
        settings: fold_settings(method),
        block_size,
        index_dir: index_dir.to_path_buf(),
    })
    .unwrap();
}

/// Parse one ranked-output line into its fields.
pub fn parse_output_line(line: &str) -> (u32, String, usize, f64, String) {
    let fields: Vec<&str> = line.split(' ').collect();
    assert_eq!(fields.len(), 6, "bad output line: {:?}", line);
    assert_eq!(fields[1], "Q0");
    (
        fields[0].parse().unwrap(),
        fields[2].to_string(),
        fields[3].parse().unwrap(),
        fields[4].parse().unwrap(),
        fields[5].to_string(),
    )
}
