// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the quarry CLI.
//!
//! Just enough polish for the indexing summary, `inspect`, and `--debug`
//! diagnostics: a handful of ANSI styles, gated on TTY detection and
//! `NO_COLOR`. The ranked run output itself is plain text on stdout and
//! never styled; pipelines consume it.

use std::sync::OnceLock;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Cached colour decision for stderr, where all styled output goes.
static COLOR: OnceLock<bool> = OnceLock::new();

fn color_enabled() -> bool {
    *COLOR.get_or_init(|| {
        std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stderr)
    })
}

/// Wrap `text` in an ANSI style when the terminal supports it.
pub fn styled(code: &str, text: &str) -> String {
    if color_enabled() {
        format!("{}{}{}", code, text, RESET)
    } else {
        text.to_string()
    }
}

/// A `label  value` row for summaries, label dimmed and padded.
pub fn row(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<14} {}", styled(DIM, label), value)
}

/// A section heading.
pub fn heading(text: &str) -> String {
    styled(BOLD, text)
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
