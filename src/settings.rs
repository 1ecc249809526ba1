// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Run configuration, created once at startup and passed by reference.
//!
//! The settings chosen at index time determine how query tokens must be
//! processed at search time: an index built with stemming is useless to a
//! query pipeline that does not stem. So the settings are persisted next to
//! the index as `settings.json` and reloaded once when a search starts.
//! A missing settings file means indexing never completed here.

use std::fs;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::paths::IndexPaths;

/// Which on-disk index layout a build produces (and a search reads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IndexingMethod {
    /// One binary file holding the whole term -> postings map.
    Simple,
    /// Single-pass in-memory indexing: sorted run files externally merged
    /// into a term-sorted posting file plus a term -> offset meta-index.
    Spimi,
    /// Seven first-letter segment files, postings keyed by document number.
    #[value(name = "map_reduce", alias = "map-reduce")]
    MapReduce,
}

impl IndexingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingMethod::Simple => "simple",
            IndexingMethod::Spimi => "spimi",
            IndexingMethod::MapReduce => "map_reduce",
        }
    }
}

/// Tokeniser flags plus the index layout. Everything a component needs to
/// know about the run, threaded explicitly instead of read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub case_folding: bool,
    pub stop_words: bool,
    pub stemming: bool,
    pub lemmatization: bool,
    pub indexing_method: IndexingMethod,
}

impl Settings {
    /// Persist as `settings.json` in the index directory.
    pub fn save(&self, paths: &IndexPaths) -> Result<()> {
        let path = paths.settings();
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::SettingsInvalid {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        fs::write(&path, json).map_err(|e| Error::io(&path, e))
    }

    /// Reload the settings written by a completed indexing run.
    pub fn load(paths: &IndexPaths) -> Result<Settings> {
        let path = paths.settings();
        if !path.is_file() {
            return Err(Error::SettingsMissing { path });
        }
        let json = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        serde_json::from_str(&json).map_err(|e| Error::SettingsInvalid {
            path,
            detail: e.to_string(),
        })
    }
}
