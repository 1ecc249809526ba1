// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A WordNet-style noun lemmatiser.
//!
//! This is the morphy detachment procedure: look the word up in an exception
//! table for irregular plurals, then peel a recognised inflectional suffix.
//! WordNet proper validates each candidate against its lexicon; without a
//! bundled lexicon the detachment rules run on their own, which matches the
//! observable behaviour for regular forms and covers the frequent irregulars
//! through the exception table.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Irregular plurals that no detachment rule handles.
static EXCEPTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("children", "child"),
        ("feet", "foot"),
        ("geese", "goose"),
        ("men", "man"),
        ("mice", "mouse"),
        ("people", "person"),
        ("teeth", "tooth"),
        ("women", "woman"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("wolves", "wolf"),
        ("halves", "half"),
        ("selves", "self"),
        ("indices", "index"),
        ("matrices", "matrix"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("data", "datum"),
    ])
});

/// Noun detachment rules, longest suffix first.
const DETACHMENTS: [(&str, &str); 8] = [
    ("ches", "ch"),
    ("shes", "sh"),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("men", "man"),
    ("s", ""),
];

/// Reduce a noun to its base form.
///
/// Words that are not inflected nouns pass through unchanged, including
/// words ending in "ss" ("glass") and words too short to carry a suffix.
pub fn lemmatize(word: &str) -> String {
    if word.len() <= 2 {
        return word.to_string();
    }

    if let Some(base) = EXCEPTIONS.get(word) {
        return (*base).to_string();
    }

    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }

    for (suffix, replacement) in DETACHMENTS {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() >= 2 {
                return format!("{}{}", stem, replacement);
            }
        }
    }

    word.to_string()
}
