//! # Fitness News
//!
//! Periodically harvests health and fitness articles from the Naver News
//! health/life category, keeps the ones matching a fixed vocabulary, and
//! writes a compact JSON snapshot for a front end to display.
//!
//! ## Usage
//!
//! ```sh
//! # Run now, then every hour, until SIGINT/SIGTERM
//! fitness_news
//!
//! # One pass, exit code reflects success
//! fitness_news --once -o ./data/fitness-news.json
//! ```
//!
//! ## Architecture
//!
//! Each run is a strictly sequential pipeline:
//! 1. **Discovery**: load the category listing, expand it, collect article URLs
//! 2. **Extraction**: visit each candidate and read its fields (500ms apart)
//! 3. **Relevance**: keep items whose title or body contains a vocabulary term
//! 4. **Aggregation**: dedup, cap at 50, truncate, fill defaults
//! 5. **Output**: replace `data/fitness-news.json` (skipped when nothing qualified)

use clap::Parser;
use futures::FutureExt;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod relevance;
mod renderer;
mod scheduler;
mod scrapers;
mod utils;

use cli::Cli;
use outputs::json;
use pipeline::{Harvester, RunOutcome};
use renderer::http::HttpLauncher;
use scheduler::{Job, Scheduler};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "fitness_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.load_config()?;
    info!(
        listing_url = %config.listing_url,
        output = %config.output_path.display(),
        interval_secs = config.interval().as_secs(),
        max_articles = config.max_articles,
        "Configuration loaded"
    );

    // Early check: the snapshot directory must be writable
    let output_dir = config
        .output_path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Snapshot directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    match json::read_snapshot(&config.output_path).await {
        Ok(Some(previous)) => info!(
            last_updated = %previous.last_updated,
            total_count = previous.total_count,
            "Found previous snapshot"
        ),
        Ok(None) => info!("No previous snapshot on disk"),
        Err(e) => warn!(error = %e, "Previous snapshot is unreadable; it will be replaced"),
    }

    let interval = config.interval();
    let harvester = Arc::new(Harvester::new(HttpLauncher::new(&config), config));

    if args.once {
        return match harvester.run_once().await {
            Ok(RunOutcome::Written { articles, path }) => {
                info!(articles, path = %path.display(), "Harvest and save succeeded");
                Ok(())
            }
            Ok(RunOutcome::Empty) => {
                warn!("No articles collected");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Harvest failed");
                Err(e.into())
            }
        };
    }

    let job: Job = {
        let harvester = Arc::clone(&harvester);
        Arc::new(move || {
            let harvester = Arc::clone(&harvester);
            async move { harvester.run_once().await }.boxed()
        })
    };

    info!(
        minutes = interval.as_secs() / 60,
        "Updating news on a fixed interval"
    );
    let handle = Scheduler::new(interval, job).start();

    shutdown_signal().await;
    info!(state = ?handle.state(), "Shutdown signal received; stopping scheduler");
    handle.stop().await;
    info!("fitness_news stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
