//! Static HTTP renderer.
//!
//! Fetches pages with `reqwest` and keeps the response body as the "rendered"
//! document. It does not run scripts, so [`Renderer::click`] is unsupported;
//! listing expansion stops at the first attempt and the statically served
//! links are harvested as a partial listing.

use super::{Launcher, LoadOptions, Renderer};
use crate::config::HarvestConfig;
use crate::error::RenderError;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Builds an [`HttpRenderer`] per run with the configured identity.
#[derive(Debug, Clone)]
pub struct HttpLauncher {
    user_agent: String,
    locale: String,
}

impl HttpLauncher {
    pub fn new(config: &HarvestConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            locale: config.locale.clone(),
        }
    }
}

impl Launcher for HttpLauncher {
    type Renderer = HttpRenderer;

    async fn launch(&self) -> Result<HttpRenderer, RenderError> {
        let mut headers = HeaderMap::new();
        let locale = HeaderValue::from_str(&self.locale)
            .map_err(|e| RenderError::Launch(format!("invalid locale header: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, locale);

        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        debug!(user_agent = %self.user_agent, locale = %self.locale, "Launched HTTP renderer");
        Ok(HttpRenderer { client, page: None })
    }
}

#[derive(Debug)]
struct LoadedPage {
    url: String,
    html: String,
}

/// One HTTP "browsing context": a client plus the last loaded page.
#[derive(Debug)]
pub struct HttpRenderer {
    client: Client,
    page: Option<LoadedPage>,
}

impl HttpRenderer {
    async fn fetch(&self, url: &str) -> Result<LoadedPage, RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| RenderError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|source| RenderError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(LoadedPage {
            url: final_url,
            html,
        })
    }
}

impl Renderer for HttpRenderer {
    #[instrument(
        level = "debug",
        skip(self, options),
        fields(timeout_ms = options.timeout.as_millis() as u64, wait_until = ?options.wait_until)
    )]
    async fn load(&mut self, url: &str, options: LoadOptions) -> Result<(), RenderError> {
        url::Url::parse(url).map_err(|source| RenderError::Url {
            url: url.to_string(),
            source,
        })?;

        let t0 = Instant::now();
        // A failed load leaves no page behind.
        self.page = None;
        let page = tokio::time::timeout(options.timeout, self.fetch(url))
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
                timeout: options.timeout,
            })??;

        debug!(
            bytes = page.html.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Loaded page"
        );
        self.page = Some(page);
        Ok(())
    }

    fn content(&self) -> Result<String, RenderError> {
        self.page
            .as_ref()
            .map(|p| p.html.clone())
            .ok_or(RenderError::NoPage)
    }

    fn current_url(&self) -> Option<String> {
        self.page.as_ref().map(|p| p.url.clone())
    }

    async fn click(&mut self, selector: &str) -> Result<(), RenderError> {
        warn!(%selector, "HTTP renderer cannot run page scripts; click ignored");
        Err(RenderError::Unsupported("click"))
    }

    async fn close(self) -> Result<(), RenderError> {
        debug!("Closed HTTP renderer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::WaitUntil;
    use std::time::Duration;

    async fn renderer() -> HttpRenderer {
        HttpLauncher::new(&HarvestConfig::default())
            .launch()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_content_before_load_is_no_page() {
        let r = renderer().await;
        assert!(matches!(r.content(), Err(RenderError::NoPage)));
        assert!(r.current_url().is_none());
    }

    #[tokio::test]
    async fn test_click_is_unsupported() {
        let mut r = renderer().await;
        let err = r.click(".btn_more").await.unwrap_err();
        assert!(matches!(err, RenderError::Unsupported("click")));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_url() {
        let mut r = renderer().await;
        let err = r
            .load(
                "not a url",
                LoadOptions::new(Duration::from_secs(1), WaitUntil::DomContentLoaded),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Url { .. }));
    }

    #[tokio::test]
    async fn test_launch_rejects_bad_locale() {
        let config = HarvestConfig {
            locale: "ko\nKR".to_string(),
            ..HarvestConfig::default()
        };
        let err = HttpLauncher::new(&config).launch().await.unwrap_err();
        assert!(matches!(err, RenderError::Launch(_)));
    }
}
