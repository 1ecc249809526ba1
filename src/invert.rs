//! In-memory inversion of a finite batch of `(id, term)` pairs.
//!
//! This is the kernel every layout shares: the simple layout inverts the
//! whole collection at once, SPIMI inverts one block at a time, and the
//! segment layout inverts one first-letter bucket at a time. Generic over
//! the id type because the dense layouts use numeric doc ids while the
//! segment layout keys postings by document number.

use std::collections::HashMap;
use std::hash::Hash;

/// Invert a batch of `(id, term)` pairs into `term -> sorted [(id, tf)]`.
///
/// One pass to group ids per term, one counting pass per list, one sort per
/// list. Posting lists come out strictly ascending by id with `tf >= 1`.
pub fn invert<K, I>(pairs: I) -> HashMap<String, Vec<(K, u32)>>
where
    K: Ord + Hash + Clone,
    I: IntoIterator<Item = (K, String)>,
{
    let mut by_term: HashMap<String, Vec<K>> = HashMap::new();
    for (id, term) in pairs {
        by_term.entry(term).or_default().push(id);
    }

    by_term
        .into_iter()
        .map(|(term, ids)| {
            let mut counts: HashMap<K, u32> = HashMap::with_capacity(ids.len());
            for id in ids {
                *counts.entry(id).or_insert(0) += 1;
            }
            let mut postings: Vec<(K, u32)> = counts.into_iter().collect();
            postings.sort_by(|a, b| a.0.cmp(&b.0));
            (term, postings)
        })
        .collect()
}
