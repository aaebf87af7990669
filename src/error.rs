//! Error types for the harvesting pipeline.
//!
//! Errors are split along the run boundary:
//! - [`RenderError`]: anything the renderer adapter reports (load timeouts,
//!   HTTP failures, unsupported interactions). Per-item render errors never
//!   leave the extractor; listing and launch errors are wrapped in
//!   [`HarvestError`] and abort the current run.
//! - [`HarvestError`]: failures that end a run. The scheduler logs them and
//!   carries on with the next tick.

use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`crate::renderer::Renderer`] or its launcher.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browsing context failed to start: {0}")]
    Launch(String),

    #[error("timed out after {timeout:?} loading {url}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no page loaded")]
    NoPage,

    #[error("renderer does not support {0}")]
    Unsupported(&'static str),
}

/// Failures that abort a single pipeline run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("listing page {url} could not be loaded: {source}")]
    Listing {
        url: String,
        #[source]
        source: RenderError,
    },

    #[error("renderer failure: {0}")]
    Renderer(#[from] RenderError),

    #[error("snapshot i/o failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
