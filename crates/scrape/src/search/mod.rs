// ABOUTME: Search client that queries a third-party search backend through a proxy.
// ABOUTME: Returns raw JSON via results() or normalized snippet text via run().

//! Web search.
//!
//! `SearchClient` issues `GET <endpoint>/<type>?q=...` with an `X-API-KEY`
//! header and renders the JSON response with one of the [`SnippetStyle`]s.
//! Missing response fields degrade to fallback text; only transport failures,
//! HTTP errors and unparseable bodies are errors.

pub mod format;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::MemoCache;
use crate::config::SearchConfig;
use crate::error::ScrapeError;
use crate::options::HttpOptions;

pub use format::{format_results, SnippetStyle, NO_DIGEST_RESULTS, NO_RESULTS};

/// Client for the configured search backend.
pub struct SearchClient {
    http: reqwest::Client,
    config: SearchConfig,
    style: SnippetStyle,
    cache: Option<MemoCache<String>>,
}

impl SearchClient {
    /// Client using the answer-first rendering, memoized per query.
    pub fn new(config: SearchConfig) -> Result<Self, ScrapeError> {
        Self::with_style(config, SnippetStyle::Answer)
    }

    /// Client using `style`; only the answer-first rendering is memoized.
    pub fn with_style(config: SearchConfig, style: SnippetStyle) -> Result<Self, ScrapeError> {
        let http = HttpOptions {
            proxy: config.proxy.clone(),
            ..HttpOptions::default()
        }
        .build_client()?;
        let cache = (style == SnippetStyle::Answer).then(MemoCache::new);
        Ok(Self {
            http,
            config,
            style,
            cache,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn style(&self) -> SnippetStyle {
        self.style
    }

    /// Run `query` and return the backend's JSON response.
    pub async fn results(&self, query: &str) -> Result<Value, ScrapeError> {
        let url = self.config.request_url();
        let num = self.config.k.to_string();
        debug!(query, url = %url, "search request");

        let response = self
            .http
            .get(&url)
            .header("X-API-KEY", self.config.api_key.as_deref().unwrap_or(""))
            .header("Content-Type", "application/json")
            .query(&[
                ("q", query),
                ("gl", self.config.gl.as_str()),
                ("hl", self.config.hl.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                ScrapeError::search(query, "Search", Some(anyhow::anyhow!("request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::search(
                query,
                "Search",
                Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
            ));
        }

        response.json::<Value>().await.map_err(|e| {
            ScrapeError::search(
                query,
                "Search",
                Some(anyhow::anyhow!("invalid JSON response: {}", e)),
            )
        })
    }

    /// Run `query` and render the response as snippet text.
    pub async fn run(&self, query: &str) -> Result<String, ScrapeError> {
        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_try_insert_with(query, || self.run_uncached(query))
                    .await
            }
            None => self.run_uncached(query).await,
        }
    }

    /// Render an already-fetched response with this client's style and limits.
    pub fn format(&self, results: &Value) -> String {
        format_results(
            results,
            self.style,
            self.config.search_type.result_key(),
            self.config.k,
        )
    }

    async fn run_uncached(&self, query: &str) -> Result<String, ScrapeError> {
        let results = self.results(query).await?;
        let text = self.format(&results);
        info!(query, chars = text.len(), "search complete");
        Ok(text)
    }
}
