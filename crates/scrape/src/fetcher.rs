// ABOUTME: Proxied page fetching with bounded retries and memoized results.
// ABOUTME: scrape_text returns raw HTML; scrape_chunks feeds it straight into the chunker.

use pagechunk_chunker::Chunker;
use tracing::{debug, info, warn};

use crate::cache::MemoCache;
use crate::error::ScrapeError;
use crate::options::{FetchOptions, FetcherBuilder};
use crate::resource::{fetch_once, validate_url};

/// Retries used when the caller has no preference.
pub const DEFAULT_RETRIES: u32 = 2;

/// Fetches pages through the configured proxy.
pub struct Fetcher {
    http: reqwest::Client,
    cache: Option<MemoCache<String>>,
    opts: FetchOptions,
}

impl Fetcher {
    /// Create a new FetcherBuilder for fluent configuration.
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    /// Create a Fetcher, building its HTTP client from `opts`.
    pub fn new(opts: FetchOptions) -> Result<Self, ScrapeError> {
        let http = opts.http.build_client()?;
        let cache = opts
            .cache
            .then(|| MemoCache::with_limits(opts.cache_ttl, opts.cache_max_entries));
        Ok(Self { http, cache, opts })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    /// Fetch `url` and return its body as text.
    ///
    /// A failed attempt is repeated up to `retries` more times; once they are
    /// used up the last attempt's error is returned unchanged. Successful
    /// results are memoized by `(url, retries)`.
    pub async fn scrape_text(&self, url: &str, retries: u32) -> Result<String, ScrapeError> {
        validate_url(url, "ScrapeText")?;

        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_try_insert_with(&(url, retries), || {
                        self.fetch_with_retries(url, retries)
                    })
                    .await
            }
            None => self.fetch_with_retries(url, retries).await,
        }
    }

    /// Fetch `url` and split the page into chunks with `chunker`.
    pub async fn scrape_chunks(
        &self,
        url: &str,
        retries: u32,
        chunker: &Chunker,
    ) -> Result<Vec<String>, ScrapeError> {
        let html = self.scrape_text(url, retries).await?;
        let chunks = chunker.chunk_html(&html);
        info!(url, chunks = chunks.len(), "chunked fetched page");
        Ok(chunks)
    }

    /// Drop memoized pages.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    async fn fetch_with_retries(&self, url: &str, retries: u32) -> Result<String, ScrapeError> {
        let mut remaining = retries;
        loop {
            debug!(url, remaining, "fetch attempt");
            match fetch_once(&self.http, url).await {
                Ok(result) => return Ok(result.text()),
                Err(err) if remaining > 0 && err.is_retryable() => {
                    warn!(url, remaining, error = %err, "fetch failed, retrying");
                    remaining -= 1;
                    if !self.opts.retry_delay.is_zero() {
                        tokio::time::sleep(self.opts.retry_delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}
