//! One full harvesting run.
//!
//! ```text
//! launch renderer
//!   └─► discover listing ──► for each candidate (until cap):
//!                              extract ─► classify ─► aggregate
//! close renderer (always)
//! write snapshot (only if something was accepted)
//! ```
//!
//! Listing failures and renderer launch or close failures abort the run with
//! a [`HarvestError`]; per-article failures are contained in the extractor.

use crate::aggregator::{Aggregator, Rejection};
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::models::{NewsArticle, Snapshot};
use crate::outputs::json;
use crate::relevance;
use crate::renderer::{Launcher, Renderer};
use crate::scrapers::discovery;
use crate::scrapers::extractor::{self, ArticleExtractor};
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A new snapshot replaced the previous one.
    Written { articles: usize, path: PathBuf },
    /// Nothing qualified; the previous snapshot was left alone.
    Empty,
}

/// Drives the pipeline against a renderer produced by `L`.
#[derive(Debug)]
pub struct Harvester<L> {
    launcher: L,
    config: HarvestConfig,
    extractor: ArticleExtractor,
}

impl<L: Launcher> Harvester<L> {
    pub fn new(launcher: L, config: HarvestConfig) -> Self {
        Self {
            launcher,
            config,
            extractor: ArticleExtractor::naver(),
        }
    }

    /// Execute one tick: harvest, then persist if anything was accepted.
    #[instrument(level = "info", skip_all)]
    pub async fn run_once(&self) -> Result<RunOutcome, HarvestError> {
        let t0 = Instant::now();
        let started_at = Utc::now();
        info!(listing_url = %self.config.listing_url, "Harvest run starting");

        let mut renderer = self.launcher.launch().await?;
        let harvested = self.harvest(&mut renderer, started_at).await;
        let closed = renderer.close().await;
        let articles = harvested?;
        if let Err(e) = closed {
            error!(error = %e, "Failed to close renderer; aborting run");
            return Err(e.into());
        }

        if articles.is_empty() {
            warn!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "No relevant articles collected; keeping previous snapshot"
            );
            return Ok(RunOutcome::Empty);
        }

        let snapshot = Snapshot::new(started_at, articles);
        json::write_snapshot(&snapshot, &self.config.output_path).await?;

        info!(
            articles = snapshot.total_count,
            path = %self.config.output_path.display(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Harvest run complete"
        );
        Ok(RunOutcome::Written {
            articles: snapshot.total_count,
            path: self.config.output_path.clone(),
        })
    }

    async fn harvest(
        &self,
        renderer: &mut L::Renderer,
        started_at: DateTime<Utc>,
    ) -> Result<Vec<NewsArticle>, HarvestError> {
        let candidates = discovery::discover(renderer, &self.config).await?;
        let run_date = started_at.date_naive();
        let mut aggregator = Aggregator::new(self.config.max_articles, run_date);
        let total = candidates.len();
        let mut visited = 0usize;

        for url in &candidates {
            if aggregator.is_full() {
                info!(
                    max = self.config.max_articles,
                    remaining = total - visited,
                    "Article cap reached; skipping remaining candidates"
                );
                break;
            }
            visited += 1;

            let Some(item) = extractor::extract(renderer, &self.extractor, url, &self.config).await
            else {
                continue;
            };

            let verdict = relevance::classify(&item.title, &item.body_text);
            if !verdict.is_relevant() {
                debug!(%url, title = %truncate_for_log(&item.title, 40), "No vocabulary match; dropping");
                continue;
            }

            match aggregator.accept(item, &verdict) {
                Ok(article) => info!(
                    visited,
                    title = %truncate_for_log(&article.title, 40),
                    keyword = %article.keyword,
                    "Accepted article"
                ),
                Err(Rejection::TitleTooShort) => debug!(%url, "Title too short; dropping"),
                Err(reason) => debug!(%url, ?reason, "Article not accepted"),
            }
        }

        info!(
            candidates = total,
            visited,
            accepted = aggregator.len(),
            "Collected relevant articles"
        );
        Ok(aggregator.into_articles())
    }
}
