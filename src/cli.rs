//! Command-line interface definitions for the fitness news harvester.
//!
//! All flags can also be supplied through environment variables, which is
//! how the process supervisor configures it in production.

use crate::config::HarvestConfig;
use crate::error::HarvestError;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the harvester.
///
/// # Examples
///
/// ```sh
/// # Run forever, once per hour, writing data/fitness-news.json
/// fitness_news
///
/// # Single pass for cron-style invocation
/// fitness_news --once -o /srv/www/data/fitness-news.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "FITNESS_NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot output path (overrides the config file)
    #[arg(short, long, env = "FITNESS_NEWS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Category listing URL to harvest (overrides the config file)
    #[arg(long, env = "FITNESS_NEWS_LISTING_URL")]
    pub listing_url: Option<String>,

    /// Seconds between scheduled runs (overrides the config file)
    #[arg(long, env = "FITNESS_NEWS_INTERVAL_SECS")]
    pub interval_secs: Option<u64>,

    /// Run the pipeline once and exit instead of scheduling
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Build the effective configuration: defaults, then the YAML file, then flags.
    pub fn load_config(&self) -> Result<HarvestConfig, HarvestError> {
        let base = match &self.config {
            Some(path) => HarvestConfig::from_yaml_file(path)?,
            None => HarvestConfig::default(),
        };
        let config = self.apply_overrides(base);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, mut config: HarvestConfig) -> HarvestConfig {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(url) = &self.listing_url {
            config.listing_url = url.clone();
        }
        if let Some(secs) = self.interval_secs {
            config.interval_ms = secs.saturating_mul(1000);
        }
        config
    }
}
