//! Data models for harvested articles and the persisted snapshot.
//!
//! This module defines the records that flow through one run:
//! - [`ExtractedItem`]: raw fields pulled from one article page
//! - [`RelevanceVerdict`]: outcome of the keyword classification
//! - [`NewsArticle`]: the normalized, persisted unit
//! - [`Snapshot`]: the document written to disk at the end of a run
//!
//! The persisted types serialize with camelCase keys, which is the schema the
//! front end reading `fitness-news.json` expects.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Constant UI hint telling the front end how many cards to show.
pub const DISPLAY_COUNT: u32 = 9;
/// Label written into every snapshot's `source` field.
pub const SNAPSHOT_SOURCE: &str = "네이버 뉴스 건강/생활";

/// Fields pulled from a single article page before classification.
///
/// Built once per visit and dropped as soon as the relevance filter rejects it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedItem {
    pub url: String,
    pub title: String,
    /// Article text with all whitespace runs collapsed to single spaces.
    pub body_text: String,
    pub press: String,
    /// `YYYY.MM.DD`, or empty when no date could be parsed.
    pub published_date: String,
    pub thumbnail_url: String,
    /// Leading slice of `body_text`.
    pub description: String,
    /// When the page was extracted.
    pub crawled_at: DateTime<Utc>,
}

/// Result of classifying an item against the relevance vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelevanceVerdict {
    /// The item matched; carries the first vocabulary term found.
    Relevant { keyword: &'static str },
    Irrelevant,
}

impl RelevanceVerdict {
    pub fn is_relevant(&self) -> bool {
        matches!(self, RelevanceVerdict::Relevant { .. })
    }

    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            RelevanceVerdict::Relevant { keyword } => Some(keyword),
            RelevanceVerdict::Irrelevant => None,
        }
    }
}

/// A persisted article entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    /// At most 100 characters.
    pub title: String,
    /// Canonical article URL, unique within a snapshot.
    pub url: String,
    /// At most 150 characters followed by `...`.
    pub description: String,
    pub press: String,
    pub thumbnail: String,
    /// `YYYY.MM.DD`.
    pub date: String,
    /// Vocabulary term that admitted the article.
    pub keyword: String,
    pub crawled_at: String,
}

/// The document written at the end of a successful run.
///
/// A snapshot fully replaces the previous one; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub last_updated: String,
    pub total_count: usize,
    pub display_count: u32,
    pub source: String,
    pub articles: Vec<NewsArticle>,
}

impl Snapshot {
    /// Wrap the accepted articles, stamping them with the run start time.
    pub fn new(run_started: DateTime<Utc>, articles: Vec<NewsArticle>) -> Self {
        Self {
            last_updated: iso_timestamp(run_started),
            total_count: articles.len(),
            display_count: DISPLAY_COUNT,
            source: SNAPSHOT_SOURCE.to_string(),
            articles,
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2025-01-15T06:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
