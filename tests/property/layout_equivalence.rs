//! The three layouts persist differently but must agree on the logical
//! index: the same `{(term, {(docno, tf)})}` relation, after renaming dense
//! doc ids through the persisted DocId -> DocNo mapping.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use tempfile::TempDir;

use crate::common::{fold_settings, write_markup};
use quarry::paths::IndexPaths;
use quarry::settings::IndexingMethod;
use quarry::stats::load_doc_map;
use quarry::{load_for_terms, run_index, IndexParams, LoadedIndex};

type LogicalIndex = BTreeMap<String, BTreeSet<(String, u32)>>;

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,5}").unwrap()
}

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(word_strategy(), 1..12).prop_map(|words| words.join(" ")),
        1..5,
    )
}

/// Build one layout over the corpus and load it back in full, renamed to
/// DocNo keys.
fn logical_index(
    texts: &[String],
    method: IndexingMethod,
    block_size: usize,
) -> LogicalIndex {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();

    let docs: Vec<(String, &str)> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| (format!("DOC-{}", i), text.as_str()))
        .collect();
    let doc_refs: Vec<(&str, &str)> = docs
        .iter()
        .map(|(docno, text)| (docno.as_str(), *text))
        .collect();
    let collection = write_markup(work.path(), "collection.trec", &doc_refs);

    run_index(&IndexParams {
        patterns: vec![collection.to_string_lossy().into_owned()],
        settings: fold_settings(method),
        block_size,
        index_dir: index_dir.path().to_path_buf(),
    })
    .unwrap();

    // Load with the full vocabulary so nothing is filtered out.
    let analyzer = crate::common::fold_analyzer();
    let vocabulary: BTreeSet<String> = texts
        .iter()
        .flat_map(|text| analyzer.tokenize(text))
        .collect();

    let paths = IndexPaths::new(index_dir.path());
    let loaded = load_for_terms(&paths, method, &vocabulary).unwrap();

    match loaded {
        LoadedIndex::Dense(postings) => {
            let doc_map = load_doc_map(&paths.doc_map()).unwrap();
            postings
                .into_iter()
                .map(|(term, list)| {
                    let renamed = list
                        .into_iter()
                        .map(|(docid, tf)| (doc_map[docid as usize].clone(), tf))
                        .collect();
                    (term, renamed)
                })
                .collect()
        }
        LoadedIndex::ByDocno(postings) => postings
            .into_iter()
            .map(|(term, list)| (term, list.into_iter().collect()))
            .collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: simple, SPIMI, and segment builds of the same collection
    /// describe the same logical index.
    #[test]
    fn prop_layouts_agree(corpus in corpus_strategy(), block_size in 1usize..16) {
        let simple = logical_index(&corpus, IndexingMethod::Simple, block_size);
        let spimi = logical_index(&corpus, IndexingMethod::Spimi, block_size);
        let segment = logical_index(&corpus, IndexingMethod::MapReduce, block_size);

        prop_assert_eq!(&simple, &spimi, "simple and SPIMI disagree");
        prop_assert_eq!(&simple, &segment, "simple and segment disagree");
    }

    /// Property: the simple layout round-trips through disk unchanged.
    #[test]
    fn prop_simple_roundtrip(corpus in corpus_strategy()) {
        use quarry::index::{load_simple_filtered, save_simple};
        use quarry::stats::DenseCorpus;
        use quarry::invert;

        let analyzer = crate::common::fold_analyzer();
        let mut state = DenseCorpus::default();
        let mut pairs = Vec::new();
        for (i, text) in corpus.iter().enumerate() {
            state
                .visit(&format!("D{}", i), text, &analyzer, &mut |docid, term| {
                    pairs.push((docid, term));
                    Ok(())
                })
                .unwrap();
        }
        let index = invert(pairs);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("simple_index.p");
        save_simple(&index, &path).unwrap();
        let loaded = load_simple_filtered(&path, |_| true).unwrap();

        prop_assert_eq!(loaded, index);
    }
}
