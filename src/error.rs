// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The crate-wide error taxonomy.
//!
//! Two policies, applied consistently:
//!
//! 1. **Fatal**: schema violations, malformed source files, missing settings,
//!    and anything that smells like index corruption. These surface as `Error`
//!    values and abort the run. The index directory is cleared at the start of
//!    every build, so a failed run never leaves artifacts that a later run
//!    would trust.
//! 2. **Ignorable**: a query term absent from the index, a document without
//!    text. These are silently skipped and never reach this module.
//!
//! Exit codes: a missing requested topic exits 1, every other surfaced error
//! exits 2, success exits 0.

use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// An I/O operation failed; `path` names the file involved.
    Io { path: PathBuf, source: io::Error },
    /// A markup collection file could not be parsed.
    Markup { path: PathBuf, detail: String },
    /// A `.json` record-list collection file could not be parsed.
    Records { path: PathBuf, detail: String },
    /// The topic file violates its schema (e.g. unequal num/title counts).
    Topics { path: PathBuf, detail: String },
    /// No settings file: indexing has not completed in this directory.
    SettingsMissing { path: PathBuf },
    /// The settings file exists but could not be decoded.
    SettingsInvalid { path: PathBuf, detail: String },
    /// A persisted index artifact is damaged (bad envelope, bad record,
    /// posting without document statistics, ...).
    Corrupt { path: PathBuf, detail: String },
    /// The SPIMI meta-index pointed at a line holding a different term.
    TermMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    /// A posting references a document with no statistics entry.
    MissingDocStats { key: String },
    /// An input pattern matched neither a file nor a directory.
    InputNotFound { pattern: String },
    /// `--topic` named a topic that the topic file does not contain.
    TopicNotFound { topic: u32 },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Error::Corrupt {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Process exit code for this error. Topic absence is the one condition
    /// callers script against, so it gets a dedicated code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::TopicNotFound { .. } => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            Error::Markup { path, detail } => {
                write!(f, "{}: invalid markup: {}", path.display(), detail)
            }
            Error::Records { path, detail } => {
                write!(f, "{}: invalid record list: {}", path.display(), detail)
            }
            Error::Topics { path, detail } => {
                write!(f, "{}: invalid topic file: {}", path.display(), detail)
            }
            Error::SettingsMissing { path } => {
                write!(
                    f,
                    "{}: no index settings found; indexing must complete before searching",
                    path.display()
                )
            }
            Error::SettingsInvalid { path, detail } => {
                write!(f, "{}: unreadable settings: {}", path.display(), detail)
            }
            Error::Corrupt { path, detail } => {
                write!(f, "{}: corrupt index data: {}", path.display(), detail)
            }
            Error::TermMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{}: meta-index offset for '{}' points at a line for '{}'",
                    path.display(),
                    expected,
                    found
                )
            }
            Error::MissingDocStats { key } => {
                write!(
                    f,
                    "corrupt index: posting for document {} has no statistics entry",
                    key
                )
            }
            Error::InputNotFound { pattern } => {
                write!(f, "input pattern '{}' matched no files", pattern)
            }
            Error::TopicNotFound { topic } => {
                write!(f, "topic {} not found in topic file", topic)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
