//! Utility functions for text normalization, logging and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Accent-insensitive normalization used by keyword matching
//! - Whitespace sanitization for API-provided text
//! - String truncation for logging
//! - Run timestamps for report file names
//! - File system helpers for input discovery and output directories

use crate::error::Result;
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercase and strip accents so that `"Inflación"` and `"inflacion"` compare equal.
///
/// The text is decomposed (NFKD) and every combining mark is dropped before
/// lowercasing.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("Señal de Inflación"), "senal de inflacion");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Collapse whitespace runs (including non-breaking spaces) and trim.
///
/// API payloads frequently contain stray newlines and `\u{00A0}`; every
/// header line of an article file must stay on a single line.
pub fn sanitize_text(text: Option<&str>) -> String {
    match text {
        None => String::new(),
        Some(s) => {
            let s = s.replace('\u{00A0}', " ");
            WHITESPACE_RUN.replace_all(&s, " ").trim().to_string()
        }
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Timestamp used in report file names, e.g. `20250506-203000`.
pub fn run_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// List the `.txt` files of a directory (extension matched case-insensitively), sorted by path.
///
/// A missing path, or one that is not a directory, yields an empty list rather than an error.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let is_dir = fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false);
    if !is_dir {
        warn!("Data directory does not exist or is not a directory");
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if is_txt && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    debug!(count = paths.len(), "Listed text files");
    Ok(paths)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
