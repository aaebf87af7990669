//! The renderer seam: how the pipeline drives a browsing context.
//!
//! The pipeline never fetches or parses pages itself. It asks a [`Renderer`]
//! to load a URL, waits, optionally clicks something, and then reads the
//! rendered HTML back through [`Renderer::content`]. DOM queries run on a
//! parsed `scraper::Html` of that content, synchronously, between suspension
//! points.
//!
//! # Architecture
//!
//! - [`Launcher`]: starts one browsing context per run
//! - [`Renderer`]: one page at a time, strictly sequential use
//! - [`http::HttpRenderer`]: production adapter over `reqwest`
//!
//! Methods return `Send` futures so a whole run can be spawned on the
//! runtime by the scheduler.

use crate::error::RenderError;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

pub mod http;

#[cfg(test)]
pub mod fake;

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    /// The document has been received and parsed.
    #[default]
    DomContentLoaded,
    /// All subresources have finished loading.
    Load,
}

/// Options for a single navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub timeout: Duration,
    pub wait_until: WaitUntil,
}

impl LoadOptions {
    pub fn new(timeout: Duration, wait_until: WaitUntil) -> Self {
        Self {
            timeout,
            wait_until,
        }
    }
}

/// A single browsing context.
pub trait Renderer: Send {
    /// Navigate to `url`, failing if it does not finish within `options.timeout`.
    fn load(
        &mut self,
        url: &str,
        options: LoadOptions,
    ) -> impl Future<Output = Result<(), RenderError>> + Send;

    /// Rendered HTML of the current page.
    fn content(&self) -> Result<String, RenderError>;

    /// URL of the current page after redirects.
    fn current_url(&self) -> Option<String>;

    /// Simulate a click on the first element matching `selector`.
    fn click(&mut self, selector: &str) -> impl Future<Output = Result<(), RenderError>> + Send;

    /// Fixed-delay wait. Not a condition wait.
    fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    /// Release the browsing context.
    fn close(self) -> impl Future<Output = Result<(), RenderError>> + Send;
}

/// Starts a fresh [`Renderer`] for each run.
pub trait Launcher: Send + Sync {
    type Renderer: Renderer;

    fn launch(&self) -> impl Future<Output = Result<Self::Renderer, RenderError>> + Send;
}
