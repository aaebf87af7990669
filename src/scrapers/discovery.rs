//! Listing discovery.
//!
//! Loads the category listing, presses "load more" a bounded number of times,
//! then collects every article link currently in the document.
//!
//! # Failure policy
//!
//! - Listing load failure: fatal for the run ([`HarvestError::Listing`])
//! - "Load more" missing or click failing: expansion stops, the partial
//!   listing is harvested

use super::naver;
use super::selectors::SelectorChain;
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::renderer::Renderer;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Discover candidate article URLs on the configured listing page.
///
/// # Returns
///
/// Normalized article URLs, each exactly once, in first-seen document order.
#[instrument(level = "info", skip_all, fields(listing_url = %config.listing_url))]
pub async fn discover<R: Renderer>(
    renderer: &mut R,
    config: &HarvestConfig,
) -> Result<Vec<String>, HarvestError> {
    let listing_url = config.listing_url.as_str();
    let listing_err = |source| HarvestError::Listing {
        url: listing_url.to_string(),
        source,
    };

    renderer
        .load(listing_url, config.listing_load())
        .await
        .map_err(listing_err)?;
    renderer.wait(config.listing_settle()).await;

    let expansions = expand_listing(renderer, &naver::load_more(), config).await;

    let html = renderer.content().map_err(listing_err)?;
    let base_url = renderer
        .current_url()
        .unwrap_or_else(|| listing_url.to_string());
    let base = Url::parse(&base_url).map_err(|source| {
        listing_err(crate::error::RenderError::Url {
            url: base_url.clone(),
            source,
        })
    })?;

    let urls = collect_article_urls(&html, &base);
    info!(count = urls.len(), expansions, "Discovered candidate article URLs");
    debug!(urls = ?urls, "Candidate URLs");
    Ok(urls)
}

/// Press the first present "load more" control up to `load_more_attempts` times.
///
/// Returns how many clicks succeeded.
async fn expand_listing<R: Renderer>(
    renderer: &mut R,
    load_more: &SelectorChain,
    config: &HarvestConfig,
) -> usize {
    let mut clicks = 0;
    for attempt in 1..=config.load_more_attempts {
        let control = renderer
            .content()
            .ok()
            .and_then(|html| load_more.matches_any(&Html::parse_document(&html)));
        let Some(selector) = control else {
            debug!(attempt, "No load-more control; stopping expansion");
            break;
        };

        if let Err(e) = renderer.click(selector).await {
            debug!(attempt, %selector, error = %e, "Load-more click failed; stopping expansion");
            break;
        }
        renderer.wait(config.load_more_delay()).await;
        clicks += 1;
        info!(attempt, max = config.load_more_attempts, "Expanded listing");
    }
    clicks
}

/// Collect normalized, deduplicated article URLs from listing HTML.
pub fn collect_article_urls(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| naver::article_url(base, href))
        .unique()
        .collect()
}
