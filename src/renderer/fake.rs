//! In-memory renderer for tests.
//!
//! A [`FakeSite`] maps URLs to canned HTML. Listing pages can carry a queue of
//! "expanded" variants that successive clicks reveal, mimicking a "load more"
//! button. Every navigation is recorded so tests can assert which pages were
//! (and were not) visited.

use super::{Launcher, LoadOptions, Renderer};
use crate::error::RenderError;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct SiteState {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    expansions: VecDeque<String>,
    visits: Vec<String>,
    clicks: Vec<String>,
    launch_fails: bool,
    close_fails: bool,
    closed: usize,
}

/// Shared fixture describing what the fake web serves.
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), html.into());
        self
    }

    /// Loading `url` fails with a timeout.
    pub fn failing(self, url: &str) -> Self {
        self.state.lock().unwrap().failing.insert(url.to_string());
        self
    }

    /// Content shown after the next successful click.
    pub fn expansion(self, html: impl Into<String>) -> Self {
        self.state.lock().unwrap().expansions.push_back(html.into());
        self
    }

    pub fn launch_fails(self) -> Self {
        self.state.lock().unwrap().launch_fails = true;
        self
    }

    /// Closing a renderer reports an error (after counting the close).
    pub fn close_fails(self) -> Self {
        self.state.lock().unwrap().close_fails = true;
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.state.lock().unwrap().visits.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    pub fn launcher(&self) -> FakeLauncher {
        FakeLauncher { site: self.clone() }
    }
}

#[derive(Debug, Clone)]
pub struct FakeLauncher {
    site: FakeSite,
}

impl Launcher for FakeLauncher {
    type Renderer = FakeRenderer;

    async fn launch(&self) -> Result<FakeRenderer, RenderError> {
        if self.site.state.lock().unwrap().launch_fails {
            return Err(RenderError::Launch("fake browser refused to start".into()));
        }
        Ok(FakeRenderer {
            site: self.site.clone(),
            current: None,
        })
    }
}

#[derive(Debug)]
pub struct FakeRenderer {
    site: FakeSite,
    current: Option<(String, String)>,
}

impl Renderer for FakeRenderer {
    async fn load(&mut self, url: &str, options: LoadOptions) -> Result<(), RenderError> {
        self.current = None;
        let mut state = self.site.state.lock().unwrap();
        state.visits.push(url.to_string());
        if state.failing.contains(url) {
            return Err(RenderError::Timeout {
                url: url.to_string(),
                timeout: options.timeout,
            });
        }
        let html = state.pages.get(url).cloned().ok_or(RenderError::Status {
            url: url.to_string(),
            status: 404,
        })?;
        self.current = Some((url.to_string(), html));
        Ok(())
    }

    fn content(&self) -> Result<String, RenderError> {
        self.current
            .as_ref()
            .map(|(_, html)| html.clone())
            .ok_or(RenderError::NoPage)
    }

    fn current_url(&self) -> Option<String> {
        self.current.as_ref().map(|(url, _)| url.clone())
    }

    async fn click(&mut self, selector: &str) -> Result<(), RenderError> {
        let mut state = self.site.state.lock().unwrap();
        state.clicks.push(selector.to_string());
        let Some(next) = state.expansions.pop_front() else {
            return Err(RenderError::Unsupported("click without a pending expansion"));
        };
        if let Some((_, html)) = self.current.as_mut() {
            *html = next;
        }
        Ok(())
    }

    async fn close(self) -> Result<(), RenderError> {
        let mut state = self.site.state.lock().unwrap();
        state.closed += 1;
        if state.close_fails {
            return Err(RenderError::Launch("fake browser failed to shut down".into()));
        }
        Ok(())
    }
}
