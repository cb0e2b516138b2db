//! HTTP page scraper backed by a shared reqwest client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};
use url::Url;

use recollect_core::defaults::{
    SCRAPE_ACCEPT, SCRAPE_MAX_BODY_BYTES, SCRAPE_MAX_REDIRECTS, SCRAPE_POOL_IDLE_PER_HOST,
    SCRAPE_POOL_IDLE_TIMEOUT_SECS, SCRAPE_TIMEOUT_SECS, SCRAPE_USER_AGENT,
};
use recollect_core::{Error, PageScraper, Result, ScrapedMetadata};

use crate::extract::extract_metadata;

/// Scraper configuration.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Whole-request deadline, body read included.
    pub timeout: Duration,
    /// Bytes read before the body is truncated.
    pub max_body_bytes: usize,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(SCRAPE_TIMEOUT_SECS),
            max_body_bytes: SCRAPE_MAX_BODY_BYTES,
            max_redirects: SCRAPE_MAX_REDIRECTS,
            user_agent: SCRAPE_USER_AGENT.to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

/// Fetches pages over HTTP and extracts their preview metadata.
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct HttpPageScraper {
    client: reqwest::Client,
    config: ScraperConfig,
}

impl HttpPageScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SCRAPE_ACCEPT));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .pool_max_idle_per_host(SCRAPE_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(SCRAPE_POOL_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ScraperConfig::default())
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Read the body chunk by chunk, stopping at the configured cap.
    async fn read_capped(&self, mut response: reqwest::Response) -> Result<Vec<u8>> {
        let cap = self.config.max_body_bytes;
        let mut body = Vec::with_capacity(cap.min(64 * 1024));

        while let Some(chunk) = response.chunk().await? {
            let remaining = cap - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!(
                    subsystem = "scrape",
                    component = "http_client",
                    body_bytes = body.len(),
                    "Body truncated at cap"
                );
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    async fn scrape(&self, url: &Url) -> Result<ScrapedMetadata> {
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status.as_u16() >= 400 {
            warn!(
                subsystem = "scrape",
                component = "http_client",
                op = "fetch",
                url = %url,
                http_status = status.as_u16(),
                "Scrape target returned error status"
            );
            return Err(Error::Fetch(format!("HTTP error: {}", status)));
        }

        let final_url = response.url().clone();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.contains("text/html") || ct.contains("application/xhtml")
            })
            // Servers that omit the header are treated as HTML.
            .unwrap_or(true);

        if !is_html {
            debug!(
                subsystem = "scrape",
                component = "http_client",
                op = "fetch",
                url = %url,
                http_status = status.as_u16(),
                "Non-HTML response, skipping body"
            );
            return Ok(ScrapedMetadata::hostname_fallback(url));
        }

        let body = self.read_capped(response).await?;
        let html = String::from_utf8_lossy(&body);
        let meta = extract_metadata(&html, url, &final_url);

        debug!(
            subsystem = "scrape",
            component = "http_client",
            op = "fetch",
            url = %url,
            http_status = status.as_u16(),
            body_bytes = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Page scraped"
        );

        Ok(meta)
    }
}
