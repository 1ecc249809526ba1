// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis: the one tokenisation pipeline shared by indexing and search.
//!
//! The transformation order is fixed and matters:
//!
//! 1. Split on runs of characters that are not ASCII letters or digits
//! 2. Case folding (if enabled)
//! 3. Stop-word removal — on surface forms, so "The" survives unless case
//!    folding already lowered it
//! 4. Stemming XOR lemmatisation
//!
//! An index built with one configuration can only be queried through the
//! same configuration; that is why [`crate::settings::Settings`] is persisted
//! with the index and the analyzer is rebuilt from it at search time.

pub mod lemma;
pub mod stopwords;

use rust_stemmers::{Algorithm, Stemmer};

use crate::settings::Settings;

pub use stopwords::is_stop_word;

/// The tokenisation pipeline, built once per run from [`Settings`].
///
/// Holds the stemmer instance so the hot loop never pays construction cost.
pub struct Analyzer {
    case_folding: bool,
    stop_words: bool,
    stemmer: Option<Stemmer>,
    lemmatization: bool,
}

impl Analyzer {
    /// Build the pipeline. Panics if both stemming and lemmatisation are
    /// requested; the argument parser rejects that combination, so reaching
    /// it here is a programming error.
    pub fn new(settings: &Settings) -> Analyzer {
        assert!(
            !(settings.stemming && settings.lemmatization),
            "stemming and lemmatization are mutually exclusive"
        );

        Analyzer {
            case_folding: settings.case_folding,
            stop_words: settings.stop_words,
            stemmer: settings
                .stemming
                .then(|| Stemmer::create(Algorithm::English)),
            lemmatization: settings.lemmatization,
        }
    }

    /// Lazily tokenise `text`. Single pass; callers do not reset it.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|piece| !piece.is_empty())
            .map(move |piece| {
                if self.case_folding {
                    piece.to_ascii_lowercase()
                } else {
                    piece.to_string()
                }
            })
            .filter(move |token| !self.stop_words || !is_stop_word(token))
            .map(move |token| match &self.stemmer {
                Some(stemmer) => stemmer.stem(&token).into_owned(),
                None if self.lemmatization => lemma::lemmatize(&token),
                None => token,
            })
    }
}
