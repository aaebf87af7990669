//! Utility functions for text normalization, logging, and file system checks.
//!
//! All length budgets in this crate count Unicode scalar values, never bytes:
//! the harvested text is mostly Hangul, where one character is three bytes.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[.\-](\d{2})[.\-](\d{2})").unwrap());

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Find the first `YYYY.MM.DD` / `YYYY-MM-DD` (mixed separators allowed) in
/// `raw` and return it as `YYYY.MM.DD`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_date("2025.01.15. 오후 3:20"), Some("2025.01.15".into()));
/// assert_eq!(normalize_date("2025-01-15 15:20:00"), Some("2025.01.15".into()));
/// assert_eq!(normalize_date("어제"), None);
/// ```
pub fn normalize_date(raw: &str) -> Option<String> {
    DATE_PATTERN
        .captures(raw)
        .map(|caps| format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
}

/// Canonical `YYYY.MM.DD` rendering of a calendar date.
pub fn format_run_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        let dropped = s.len() - kept.len();
        format!("{kept}…(+{dropped} bytes)")
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
