//! Runtime configuration for the harvester.
//!
//! Every knob has a default matching the production behaviour, so the binary
//! runs with no configuration at all. An optional YAML file can override any
//! subset of fields; command-line flags are applied on top of that in
//! [`crate::cli::Cli::apply_overrides`].
//!
//! ```yaml
//! listing_url: https://news.naver.com/breakingnews/section/103/241
//! output_path: data/fitness-news.json
//! interval_ms: 3600000
//! max_articles: 50
//! ```

use crate::error::HarvestError;
use crate::renderer::{LoadOptions, WaitUntil};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_LISTING_URL: &str = "https://news.naver.com/breakingnews/section/103/241";
pub const DEFAULT_OUTPUT_PATH: &str = "data/fitness-news.json";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_LOCALE: &str = "ko-KR";

/// All tunables of one harvester process.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HarvestConfig {
    /// Category listing that enumerates candidate articles.
    pub listing_url: String,
    /// Where the snapshot document is written.
    pub output_path: PathBuf,
    /// Scheduler period.
    pub interval_ms: u64,
    /// Hard cap of accepted articles per run.
    pub max_articles: usize,
    /// How many times the "load more" control is tried on the listing.
    pub load_more_attempts: usize,
    pub listing_timeout_ms: u64,
    pub listing_settle_ms: u64,
    pub load_more_delay_ms: u64,
    pub item_timeout_ms: u64,
    pub item_settle_ms: u64,
    /// Pause after every item visit, success or failure.
    pub inter_item_delay_ms: u64,
    /// Readiness point for navigations (`domcontentloaded` or `load`).
    pub wait_until: WaitUntil,
    pub user_agent: String,
    pub locale: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            interval_ms: 60 * 60 * 1000,
            max_articles: 50,
            load_more_attempts: 3,
            listing_timeout_ms: 30_000,
            listing_settle_ms: 2_000,
            load_more_delay_ms: 1_500,
            item_timeout_ms: 15_000,
            item_settle_ms: 1_000,
            inter_item_delay_ms: 500,
            wait_until: WaitUntil::DomContentLoaded,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl HarvestConfig {
    /// Load a YAML config file, falling back to defaults for missing fields.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| HarvestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, HarvestError> {
        let config: Self =
            serde_yaml::from_str(raw).map_err(|e| HarvestError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.interval_ms == 0 {
            return Err(HarvestError::Config("interval_ms must be positive".into()));
        }
        if self.max_articles == 0 {
            return Err(HarvestError::Config("max_articles must be positive".into()));
        }
        url::Url::parse(&self.listing_url)
            .map_err(|e| HarvestError::Config(format!("listing_url: {e}")))?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn listing_load(&self) -> LoadOptions {
        LoadOptions::new(Duration::from_millis(self.listing_timeout_ms), self.wait_until)
    }

    pub fn listing_settle(&self) -> Duration {
        Duration::from_millis(self.listing_settle_ms)
    }

    pub fn load_more_delay(&self) -> Duration {
        Duration::from_millis(self.load_more_delay_ms)
    }

    pub fn item_load(&self) -> LoadOptions {
        LoadOptions::new(Duration::from_millis(self.item_timeout_ms), self.wait_until)
    }

    pub fn item_settle(&self) -> Duration {
        Duration::from_millis(self.item_settle_ms)
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.inter_item_delay_ms)
    }
}
