//! Text cleanup and file system helpers.
//!
//! - Summary normalisation for feed and scraped text (tag stripping,
//!   whitespace collapsing, length limits)
//! - String truncation for log output
//! - Data directory validation

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Longest summary kept on a record, in characters.
pub const SUMMARY_MAX_CHARS: usize = 500;

pub(crate) static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Collapse every run of whitespace into one space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// First `max` characters of `s`, never splitting a code point.
pub fn take_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Cap a summary at [`SUMMARY_MAX_CHARS`]: longer text keeps its first 497
/// characters followed by `"..."`.
pub fn truncate_summary(s: &str) -> String {
    if s.chars().count() > SUMMARY_MAX_CHARS {
        format!("{}...", take_chars(s, SUMMARY_MAX_CHARS - 3))
    } else {
        s.to_string()
    }
}

/// Turn a feed summary into plain text.
///
/// Strips markup, decodes entities, collapses whitespace and applies
/// [`truncate_summary`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_summary("<p>Hello&nbsp;<b>world</b></p>"), "Hello world");
/// ```
pub fn clean_summary(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    truncate_summary(&collapse_whitespace(&decoded))
}

/// Truncate a string for logging purposes.
///
/// Long strings keep their first `max` characters with `"…(+N chars)"`
/// appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", take_chars(s, max), total - max)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Data directory is writable");
    Ok(())
}
