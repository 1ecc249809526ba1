// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! English stop words, embedded at compile time.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The classic NLTK English stop-word list, one word per line.
///
/// These words are:
/// 1. Too common to be useful for ranking
/// 2. A large share of any English collection's tokens, so dropping them
///    shrinks every index layout
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("../../data/stopwords_en.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

/// Check if a word is a stop word.
///
/// The list is lowercase; callers that disabled case folding will only hit
/// it with tokens that happen to be lowercase already. That asymmetry is
/// intentional: stop-word removal sees tokens in surface form.
#[inline]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}
