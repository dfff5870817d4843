//! Utility functions for text truncation, word counting, and export naming.
//!
//! This module provides small helpers used by the pipeline stages:
//! - Character-boundary-safe truncation for the extraction and excerpt caps
//! - Whitespace-based word counting for the summarization gate
//! - Export filename derivation from the search keyword

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Truncate a string to at most `max` characters.
///
/// Unlike byte slicing, this never splits a multi-byte character. Strings
/// already within the limit are returned unchanged.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of characters to keep
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Count whitespace-separated words in a string.
///
/// This is the gate used by the summarization stage: texts with fewer than
/// 50 words are never sent to the model.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Collapse runs of whitespace (including newlines) into single spaces.
///
/// Scraped paragraph text often carries indentation and stray newlines from
/// the page markup; this normalizes each paragraph before it is joined into
/// the article body.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").to_string()
}

/// Derive the CSV export filename from the search keyword.
///
/// Spaces become underscores and the `_news.csv` suffix is appended, so
/// `"Acme Corp Lawsuit"` exports as `Acme_Corp_Lawsuit_news.csv`.
pub fn export_filename(keyword: &str) -> String {
    format!("{}_news.csv", keyword.replace(' ', "_"))
}
