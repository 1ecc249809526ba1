//! Universal index invariants: posting order, term frequencies, and the
//! conservation law between document lengths and posting lists.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::common::fold_analyzer;
use quarry::stats::DenseCorpus;
use quarry::{invert, segment_key, SEGMENT_KEYS};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Generate random word-like strings.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{1,8}").unwrap()
}

/// Generate random document text (multiple words).
fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..20).prop_map(|words| words.join(" "))
}

/// Generate a corpus of documents.
fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(document_strategy(), 1..8)
}

/// Tokenise a corpus into `(docid, term)` pairs through the ingestion
/// visitor, returning the pairs and the accumulated corpus state.
fn ingest(texts: &[String]) -> (Vec<(u32, String)>, DenseCorpus) {
    let analyzer = fold_analyzer();
    let mut corpus = DenseCorpus::default();
    let mut pairs = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        corpus
            .visit(&format!("D{}", i), text, &analyzer, &mut |docid, term| {
                pairs.push((docid, term));
                Ok(())
            })
            .unwrap();
    }
    (pairs, corpus)
}

// ============================================================================
// INVERSION PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: posting lists are strictly ascending by doc id.
    #[test]
    fn prop_posting_lists_strictly_ascending(corpus in corpus_strategy()) {
        let (pairs, _) = ingest(&corpus);
        let index = invert(pairs);

        for (term, postings) in &index {
            for i in 1..postings.len() {
                prop_assert!(
                    postings[i - 1].0 < postings[i].0,
                    "posting list for '{}' not strictly ascending at {}: {} then {}",
                    term, i, postings[i - 1].0, postings[i].0
                );
            }
        }
    }

    /// Property: every term frequency is at least 1.
    #[test]
    fn prop_term_frequencies_positive(corpus in corpus_strategy()) {
        let (pairs, _) = ingest(&corpus);
        let index = invert(pairs);

        for (term, postings) in &index {
            for &(docid, tf) in postings {
                prop_assert!(tf >= 1, "tf for ('{}', {}) is {}", term, docid, tf);
            }
        }
    }

    /// Property: document length equals the total token count, and the tf
    /// contributions of a document across all posting lists sum to dl.
    #[test]
    fn prop_document_length_conserved(corpus in corpus_strategy()) {
        let (pairs, state) = ingest(&corpus);

        let analyzer = fold_analyzer();
        let token_counts: Vec<usize> = corpus
            .iter()
            .map(|text| analyzer.tokenize(text).count())
            .collect();

        let index = invert(pairs);
        let mut tf_sums: HashMap<u32, u64> = HashMap::new();
        for postings in index.values() {
            for &(docid, tf) in postings {
                *tf_sums.entry(docid).or_insert(0) += u64::from(tf);
            }
        }

        // Every document in this corpus is non-empty, so ids are 0..len.
        for (docid, stats) in state.doc_stats.iter().enumerate() {
            prop_assert_eq!(stats.dl as usize, token_counts[docid]);
            prop_assert_eq!(
                u64::from(stats.dl),
                tf_sums.get(&(docid as u32)).copied().unwrap_or(0),
                "tf contributions of doc {} do not sum to its dl", docid
            );
        }
    }

    /// Property: every docid in any posting list has a statistics entry.
    #[test]
    fn prop_postings_have_doc_stats(corpus in corpus_strategy()) {
        let (pairs, state) = ingest(&corpus);
        let index = invert(pairs);

        for postings in index.values() {
            for &(docid, _) in postings {
                prop_assert!(
                    (docid as usize) < state.doc_stats.len(),
                    "docid {} has no statistics entry", docid
                );
            }
        }
    }
}

// ============================================================================
// SEGMENT KEY PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every term lands in exactly one of the seven buckets.
    #[test]
    fn prop_segment_key_total(term in word_strategy()) {
        let key = segment_key(&term);
        prop_assert!(SEGMENT_KEYS.contains(&key));
    }

    /// Property: the bucket is the first upper bound >= the first character
    /// (digits sort below 'a' and land in the first bucket).
    #[test]
    fn prop_segment_key_is_first_upper_bound(term in word_strategy()) {
        let first = term.chars().next().unwrap().to_ascii_lowercase();
        let expected = SEGMENT_KEYS[..6]
            .iter()
            .copied()
            .find(|&key| first <= key)
            .unwrap_or('o');
        prop_assert_eq!(segment_key(&term), expected);
    }
}
