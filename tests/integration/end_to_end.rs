//! Index-integrity scenarios over the three-document fox collection,
//! tokenised with case folding only.

use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;

use crate::common::{fold_analyzer, index_fox_collection, index_fox_collection_with_block_size};
use quarry::paths::IndexPaths;
use quarry::settings::IndexingMethod;
use quarry::spimi::parse_posting_line;
use quarry::{load_for_terms, LoadedIndex};

fn all_terms() -> BTreeSet<String> {
    let analyzer = fold_analyzer();
    [crate::common::D1, crate::common::D2, crate::common::D3]
        .iter()
        .flat_map(|text| analyzer.tokenize(text))
        .collect()
}

fn load_dense(index_dir: &TempDir) -> std::collections::HashMap<String, Vec<(u32, u32)>> {
    let paths = IndexPaths::new(index_dir.path());
    match load_for_terms(&paths, IndexingMethod::Spimi, &all_terms()).unwrap() {
        LoadedIndex::Dense(postings) => postings,
        LoadedIndex::ByDocno(_) => panic!("SPIMI loads dense postings"),
    }
}

/// S1: document frequencies and the postings of "lazy" after a SPIMI build.
#[test]
fn test_spimi_index_integrity() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::Spimi);

    let postings = load_dense(&index_dir);

    let df = |term: &str| postings.get(term).map_or(0, Vec::len);
    assert_eq!(df("the"), 2);
    assert_eq!(df("quick"), 2);
    assert_eq!(df("fox"), 2);
    assert_eq!(df("lazy"), 2);
    assert_eq!(df("dog"), 2);
    assert_eq!(df("jumps"), 1);

    // D2 has doc id 1, D3 has doc id 2; "lazy" occurs once in D2, twice in D3.
    assert_eq!(postings["lazy"], vec![(1, 1), (2, 2)]);
}

/// S2: forcing three-pair blocks must not change the merged output.
#[test]
fn test_merge_aggregation_with_tiny_blocks() {
    let work_a = TempDir::new().unwrap();
    let index_a = TempDir::new().unwrap();
    index_fox_collection(work_a.path(), index_a.path(), IndexingMethod::Spimi);

    let work_b = TempDir::new().unwrap();
    let index_b = TempDir::new().unwrap();
    index_fox_collection_with_block_size(work_b.path(), index_b.path(), IndexingMethod::Spimi, 3);

    assert_eq!(load_dense(&index_a), load_dense(&index_b));

    // The collection has 16 tokens, so block size 3 forces multiple runs;
    // "the" appears in blocks from both D1 and D2 and must aggregate.
    let postings = load_dense(&index_b);
    assert_eq!(postings["the"], vec![(0, 1), (1, 2)]);
}

/// The merged posting file itself is term-sorted and parses line by line.
#[test]
fn test_spimi_file_is_term_sorted() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection_with_block_size(work.path(), index_dir.path(), IndexingMethod::Spimi, 3);

    let paths = IndexPaths::new(index_dir.path());
    let content = fs::read_to_string(paths.spimi_index()).unwrap();
    let terms: Vec<String> = content
        .lines()
        .map(|line| parse_posting_line(line).unwrap().0)
        .collect();

    assert!(!terms.is_empty());
    for i in 1..terms.len() {
        assert!(terms[i - 1] < terms[i]);
    }
}

/// The segment layout stores DocNos and covers the same vocabulary.
#[test]
fn test_segment_layout_uses_docnos() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::MapReduce);

    let paths = IndexPaths::new(index_dir.path());
    let loaded = load_for_terms(&paths, IndexingMethod::MapReduce, &all_terms()).unwrap();
    let LoadedIndex::ByDocno(postings) = loaded else {
        panic!("segment layout loads DocNo postings");
    };

    assert_eq!(
        postings["lazy"],
        vec![("D2".to_string(), 1), ("D3".to_string(), 2)]
    );
    assert_eq!(postings.len(), all_terms().len());
}
