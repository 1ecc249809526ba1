// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Topic file parsing.
//!
//! TREC adhoc topic files are free text; the only structure we rely on is
//! that every topic carries a `<num> Number: NNN` line (three digits
//! starting with 4) and a `<title>` line. All numbers are collected in
//! order, all titles in order, and the two lists are zipped. Unequal counts
//! mean the file is damaged and the run aborts.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::analyze::Analyzer;
use crate::corpus::read_latin1;
use crate::error::{Error, Result};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<num> Number: (4\d\d)").expect("static regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title> (.*)").expect("static regex"));

/// One query: a three-digit id and its title, tokenised through the same
/// analyzer configuration the index was built with. Terms are kept in
/// occurrence order and deliberately not deduplicated: a term repeated in
/// the title contributes once per occurrence to the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: u32,
    pub terms: Vec<String>,
}

/// Parse the topic file at `path`.
pub fn parse_topics(path: &Path, analyzer: &Analyzer) -> Result<Vec<Topic>> {
    let content = read_latin1(path)?;
    parse_topics_str(&content, path, analyzer)
}

fn parse_topics_str(content: &str, path: &Path, analyzer: &Analyzer) -> Result<Vec<Topic>> {
    let numbers: Vec<u32> = NUMBER_RE
        .captures_iter(content)
        .map(|captures| captures[1].parse().expect("three digits"))
        .collect();
    let titles: Vec<&str> = TITLE_RE
        .captures_iter(content)
        .map(|captures| captures.get(1).expect("capture group").as_str())
        .collect();

    if numbers.len() != titles.len() {
        return Err(Error::Topics {
            path: path.to_path_buf(),
            detail: format!(
                "number of <num> and <title> tags must be equal ({} vs {})",
                numbers.len(),
                titles.len()
            ),
        });
    }

    Ok(numbers
        .into_iter()
        .zip(titles)
        .map(|(id, title)| Topic {
            id,
            terms: analyzer.tokenize(title).collect(),
        })
        .collect())
}
