// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document sources: turning collection files into `(docno, text)` pairs.
//!
//! Two formats, selected by file name:
//!
//! - **Markup** (default): a concatenation of `DOC` elements, each carrying a
//!   `DOCNO` identifier and usually a `TEXT` body. Collection files have no
//!   single root, so we wrap the contents in a synthetic one before parsing.
//!   Malformed markup is fatal; silently skipping a broken file would
//!   silently shrink the collection.
//! - **Record list** (`*.json`): a JSON array of `{docno, text}` records.
//!   Records with `"text": null` are skipped, mirroring markup documents
//!   without a `TEXT` element.
//!
//! Collection files are Latin-1. That encoding maps every byte to the code
//! point of the same value, so decoding is a straight byte-to-char widening.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Expand CLI patterns into the sorted list of input files.
///
/// Files are taken as-is, directories are walked recursively, anything else
/// is tried as a glob pattern. The final list is sorted lexicographically:
/// ingestion order decides doc-id assignment, so it must be reproducible
/// across runs and machines.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let glob_pattern = if path.is_dir() {
            format!("{}/**/*", pattern.trim_end_matches('/'))
        } else {
            pattern.clone()
        };

        let entries = glob::glob(&glob_pattern).map_err(|_| Error::InputNotFound {
            pattern: pattern.clone(),
        })?;

        let before = files.len();
        for entry in entries {
            match entry {
                Ok(p) if p.is_file() => files.push(p),
                Ok(_) => {}
                Err(e) => {
                    let p = e.path().to_path_buf();
                    return Err(Error::io(p, e.into_error()));
                }
            }
        }
        if files.len() == before && !path.is_dir() {
            return Err(Error::InputNotFound {
                pattern: pattern.clone(),
            });
        }
    }

    files.sort();
    Ok(files)
}

/// Read a file as Latin-1 text.
pub fn read_latin1(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Read one collection file into `(docno, text)` pairs, format by suffix.
pub fn read_documents(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = read_latin1(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        parse_records(&raw, path)
    } else {
        parse_markup(&raw, path)
    }
}

/// Parse a markup collection file.
///
/// For each `DOC`: the trimmed `DOCNO` text, and the newline-joined text
/// descendants of `TEXT` (inner markup contributes its text content).
/// Documents without a `TEXT` element, or whose text is empty, are skipped.
pub fn parse_markup(content: &str, path: &Path) -> Result<Vec<(String, String)>> {
    let wrapped = format!("<ROOT>{}</ROOT>", content);
    let tree = roxmltree::Document::parse(&wrapped).map_err(|e| Error::Markup {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut documents = Vec::new();
    for doc in tree
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("DOC"))
    {
        let docno = doc
            .children()
            .find(|node| node.has_tag_name("DOCNO"))
            .and_then(|node| node.text())
            .ok_or_else(|| Error::Markup {
                path: path.to_path_buf(),
                detail: "DOC element without a DOCNO".to_string(),
            })?
            .trim()
            .to_string();

        let Some(text_el) = doc.children().find(|node| node.has_tag_name("TEXT")) else {
            continue;
        };
        let text = text_el
            .descendants()
            .filter(|node| node.is_text())
            .filter_map(|node| node.text())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            continue;
        }

        documents.push((docno, text));
    }

    Ok(documents)
}

#[derive(Deserialize)]
struct Record {
    docno: String,
    text: Option<String>,
}

/// Parse a `.json` record-list file. Records with null text are skipped.
pub fn parse_records(content: &str, path: &Path) -> Result<Vec<(String, String)>> {
    let records: Vec<Record> = serde_json::from_str(content).map_err(|e| Error::Records {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(records
        .into_iter()
        .filter_map(|record| record.text.map(|text| (record.docno, text)))
        .collect())
}
