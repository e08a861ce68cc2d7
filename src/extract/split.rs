// src/extract/split.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum run of dashes the salary list prints between employees.
pub const SEPARATOR_MIN_DASHES: usize = 80;

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("-{{{},}}", SEPARATOR_MIN_DASHES)).unwrap());

/// Split normalized text into per-employee blocks.
///
/// Separator runs are consumed. Empty blocks at the document boundaries are
/// kept; they extract to all-absent records and are dropped at the table stage.
pub fn split_blocks(text: &str) -> Vec<&str> {
    SEPARATOR_RE.split(text).collect()
}
