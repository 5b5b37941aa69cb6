// ABOUTME: Configuration options for HTTP access, including HttpOptions, FetchOptions and FetcherBuilder.
// ABOUTME: FetcherBuilder provides a fluent API for constructing Fetcher instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ProxyConfig;
use crate::error::ScrapeError;
use crate::fetcher::Fetcher;

/// Settings shared by every outbound HTTP client.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub proxy: Option<ProxyConfig>,
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Duration::from_secs(30),
            user_agent: "Pagechunk/1.0".to_string(),
            headers: HashMap::new(),
            accept_invalid_certs: false,
        }
    }
}

impl HttpOptions {
    /// Build a reqwest client for these settings.
    ///
    /// Without an explicit proxy, environment proxy variables are ignored.
    pub fn build_client(&self) -> Result<reqwest::Client, ScrapeError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ScrapeError::config(key.clone(), "BuildClient", Some(anyhow::anyhow!(e)))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ScrapeError::config(key.clone(), "BuildClient", Some(anyhow::anyhow!(e)))
            })?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .default_headers(headers)
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        builder = match &self.proxy {
            Some(proxy) => builder.proxy(proxy.to_reqwest()?),
            None => builder.no_proxy(),
        };

        builder.build().map_err(|e| {
            ScrapeError::config(
                "http client",
                "BuildClient",
                Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
            )
        })
    }
}

/// Configuration options for a Fetcher.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub http: HttpOptions,
    /// Memoize successful fetches by `(url, retries)`.
    pub cache: bool,
    pub cache_ttl: Option<Duration>,
    pub cache_max_entries: Option<usize>,
    /// Pause between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            http: HttpOptions::default(),
            cache: true,
            cache_ttl: None,
            cache_max_entries: None,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Builder for constructing Fetcher instances with custom configuration.
#[derive(Debug, Clone)]
pub struct FetcherBuilder {
    opts: FetchOptions,
}

impl FetcherBuilder {
    /// Create a new FetcherBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: FetchOptions::default(),
        }
    }

    /// Route requests through an authenticated proxy.
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.opts.http.proxy = Some(proxy);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.http.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.http.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.http.headers.insert(key.into(), value.into());
        self
    }

    /// Accept invalid TLS certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.opts.http.accept_invalid_certs = accept;
        self
    }

    /// Enable or disable memoization of successful fetches.
    pub fn cache(mut self, enabled: bool) -> Self {
        self.opts.cache = enabled;
        self
    }

    /// Limit how long and how many fetch results are memoized.
    pub fn cache_limits(mut self, ttl: Option<Duration>, max_entries: Option<usize>) -> Self {
        self.opts.cache_ttl = ttl;
        self.opts.cache_max_entries = max_entries;
        self
    }

    /// Wait this long before each retry.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.opts.retry_delay = delay;
        self
    }

    /// Build the Fetcher with the configured options.
    pub fn build(self) -> Result<Fetcher, ScrapeError> {
        Fetcher::new(self.opts)
    }
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
