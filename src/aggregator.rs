//! Bounded, deduplicating accumulator for accepted articles.
//!
//! Rules applied to every relevant item, in order:
//! 1. duplicate URLs are ignored
//! 2. titles shorter than [`MIN_TITLE_CHARS`] are dropped as extraction noise
//! 3. title and description are cut to their budgets
//! 4. empty press and date fields get their defaults
//!
//! Once [`Aggregator::is_full`] reports true the pipeline stops visiting
//! candidates altogether.

use crate::models::{ExtractedItem, NewsArticle, RelevanceVerdict, iso_timestamp};
use crate::scrapers::naver::FALLBACK_PRESS;
use crate::utils::{format_run_date, truncate_chars};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

pub const MIN_TITLE_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

/// Why an item was not added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Irrelevant,
    DuplicateUrl,
    TitleTooShort,
    CapReached,
}

#[derive(Debug)]
pub struct Aggregator {
    max_articles: usize,
    run_date: String,
    seen: HashSet<String>,
    articles: Vec<NewsArticle>,
}

impl Aggregator {
    /// `run_date` is substituted for articles whose date could not be parsed.
    pub fn new(max_articles: usize, run_date: NaiveDate) -> Self {
        Self {
            max_articles,
            run_date: format_run_date(run_date),
            seen: HashSet::new(),
            articles: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.articles.len() >= self.max_articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Try to add one classified item. On success returns the stored article.
    pub fn accept(
        &mut self,
        item: ExtractedItem,
        verdict: &RelevanceVerdict,
    ) -> Result<&NewsArticle, Rejection> {
        let Some(keyword) = verdict.keyword() else {
            return Err(Rejection::Irrelevant);
        };
        if self.is_full() {
            return Err(Rejection::CapReached);
        }
        if self.seen.contains(&item.url) {
            return Err(Rejection::DuplicateUrl);
        }
        if item.title.chars().count() < MIN_TITLE_CHARS {
            debug!(url = %item.url, title = %item.title, "Title too short; dropping");
            return Err(Rejection::TitleTooShort);
        }

        let article = NewsArticle {
            title: truncate_chars(&item.title, TITLE_MAX_CHARS),
            description: format!(
                "{}{ELLIPSIS}",
                truncate_chars(&item.description, DESCRIPTION_MAX_CHARS)
            ),
            press: if item.press.is_empty() {
                FALLBACK_PRESS.to_string()
            } else {
                item.press
            },
            thumbnail: item.thumbnail_url,
            date: if item.published_date.is_empty() {
                self.run_date.clone()
            } else {
                item.published_date
            },
            keyword: keyword.to_string(),
            crawled_at: iso_timestamp(item.crawled_at),
            url: item.url,
        };

        self.seen.insert(article.url.clone());
        let index = self.articles.len();
        self.articles.push(article);
        Ok(&self.articles[index])
    }

    /// Accepted articles in acceptance order.
    pub fn into_articles(self) -> Vec<NewsArticle> {
        self.articles
    }
}
