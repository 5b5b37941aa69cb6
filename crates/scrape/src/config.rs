// ABOUTME: Explicit configuration for proxy credentials and the search backend.
// ABOUTME: Loads from environment variables by prefix and fails fast on missing settings.

use std::env;
use std::fmt;

use crate::error::ScrapeError;

/// Env prefix for the page-fetching (unblocker) proxy.
pub const UNBLOCKER_PREFIX: &str = "UNBLOCKER";
/// Env prefix for the search proxy and API key.
pub const SERP_PREFIX: &str = "SERP";

/// Default number of organic results rendered by a search.
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Credentials for an authenticated HTTP proxy.
///
/// Values are opaque and passed through as given.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ProxyConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Proxy URL without credentials: `http://host`.
    pub fn proxy_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        }
    }

    /// Proxy routing every scheme through this host with basic auth.
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy, ScrapeError> {
        let proxy = reqwest::Proxy::all(self.proxy_url()).map_err(|e| {
            ScrapeError::config(
                self.host.clone(),
                "ProxyConfig",
                Some(anyhow::anyhow!("invalid proxy host: {}", e)),
            )
        })?;
        Ok(proxy.basic_auth(&self.username, &self.password))
    }

    /// Read `<PREFIX>_HOST`, `<PREFIX>_USERNAME` and `<PREFIX>_PASSWORD` from the environment.
    pub fn from_env(prefix: &str) -> Result<Self, ScrapeError> {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    /// Like [`ProxyConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: require(prefix, "HOST", &lookup)?,
            username: require(prefix, "USERNAME", &lookup)?,
            password: require(prefix, "PASSWORD", &lookup)?,
        })
    }
}

fn var_name(prefix: &str, field: &str) -> String {
    format!("{}_{}", prefix, field)
}

fn optional<F>(prefix: &str, field: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&var_name(prefix, field)).filter(|v| !v.trim().is_empty())
}

fn require<F>(prefix: &str, field: &str, lookup: &F) -> Result<String, ScrapeError>
where
    F: Fn(&str) -> Option<String>,
{
    let key = var_name(prefix, field);
    match lookup(&key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ScrapeError::config(
            key.clone(),
            "LoadConfig",
            Some(anyhow::anyhow!("environment variable {} is not set", key)),
        )),
    }
}

/// Kind of search, selecting the request path and the result array to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    Search,
    News,
    Places,
    Images,
}

impl SearchType {
    /// Path segment appended to the search endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Search => "search",
            SearchType::News => "news",
            SearchType::Places => "places",
            SearchType::Images => "images",
        }
    }

    /// Response key holding the result list for this type.
    pub fn result_key(&self) -> &'static str {
        match self {
            SearchType::Search => "organic",
            SearchType::News => "news",
            SearchType::Places => "places",
            SearchType::Images => "images",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for SearchType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "news" => SearchType::News,
            "places" => SearchType::Places,
            "images" => SearchType::Images,
            _ => SearchType::Search,
        }
    }
}

/// Settings for the search backend.
#[derive(Clone)]
pub struct SearchConfig {
    /// Base URL of the search API; the search type is appended as a path segment.
    pub endpoint: String,
    pub proxy: Option<ProxyConfig>,
    pub api_key: Option<String>,
    /// Maximum number of results rendered.
    pub k: usize,
    /// Country code.
    pub gl: String,
    /// Interface language.
    pub hl: String,
    pub search_type: SearchType,
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("proxy", &self.proxy)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("k", &self.k)
            .field("gl", &self.gl)
            .field("hl", &self.hl)
            .field("search_type", &self.search_type)
            .finish()
    }
}

impl SearchConfig {
    /// Config for `endpoint` with no proxy, no key and default locale settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            proxy: None,
            api_key: None,
            k: DEFAULT_RESULT_COUNT,
            gl: "us".to_string(),
            hl: "en".to_string(),
            search_type: SearchType::Search,
        }
    }

    /// Build from `SERP_*` variables; `SERP_ENDPOINT` defaults to `https://<SERP_HOST>`.
    pub fn from_env() -> Result<Self, ScrapeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`SearchConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let proxy = ProxyConfig::from_lookup(SERP_PREFIX, &lookup)?;
        let endpoint = optional(SERP_PREFIX, "ENDPOINT", &lookup)
            .unwrap_or_else(|| format!("https://{}", proxy.host));
        Ok(Self {
            proxy: Some(proxy),
            api_key: optional(SERP_PREFIX, "API_KEY", &lookup),
            ..Self::new(endpoint)
        })
    }

    /// Config for an explicit `endpoint`, reading the optional `SERP_*` settings.
    ///
    /// A proxy is attached only when `SERP_HOST` is set, and then its username
    /// and password are required. `SERP_API_KEY` is used when present.
    pub fn direct_from_env(endpoint: impl Into<String>) -> Result<Self, ScrapeError> {
        Self::direct_from_lookup(endpoint, |key| env::var(key).ok())
    }

    /// Like [`SearchConfig::direct_from_env`], reading values through `lookup`.
    pub fn direct_from_lookup<F>(endpoint: impl Into<String>, lookup: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let proxy = match optional(SERP_PREFIX, "HOST", &lookup) {
            Some(_) => Some(ProxyConfig::from_lookup(SERP_PREFIX, &lookup)?),
            None => None,
        };
        Ok(Self {
            proxy,
            api_key: optional(SERP_PREFIX, "API_KEY", &lookup),
            ..Self::new(endpoint)
        })
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_locale(mut self, gl: impl Into<String>, hl: impl Into<String>) -> Self {
        self.gl = gl.into();
        self.hl = hl.into();
        self
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    /// Full request URL: `<endpoint>/<type>`.
    pub fn request_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.search_type.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn proxy_from_lookup() {
        let lookup = lookup_from(&[
            ("UNBLOCKER_HOST", "proxy.test:22225"),
            ("UNBLOCKER_USERNAME", "user"),
            ("UNBLOCKER_PASSWORD", "secret"),
        ]);
        let proxy = ProxyConfig::from_lookup(UNBLOCKER_PREFIX, lookup).unwrap();
        assert_eq!(proxy, ProxyConfig::new("proxy.test:22225", "user", "secret"));
        assert_eq!(proxy.proxy_url(), "http://proxy.test:22225");
        assert!(proxy.to_reqwest().is_ok());
    }

    #[test]
    fn proxy_url_keeps_explicit_scheme() {
        let proxy = ProxyConfig::new("https://proxy.test", "u", "p");
        assert_eq!(proxy.proxy_url(), "https://proxy.test");
    }

    #[test]
    fn missing_variable_is_named_in_error() {
        let lookup = lookup_from(&[("UNBLOCKER_HOST", "h"), ("UNBLOCKER_PASSWORD", "p")]);
        let err = ProxyConfig::from_lookup(UNBLOCKER_PREFIX, lookup).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.target, "UNBLOCKER_USERNAME");
        assert!(err.to_string().contains("UNBLOCKER_USERNAME is not set"));
    }

    #[test]
    fn blank_variable_counts_as_missing() {
        let lookup = lookup_from(&[
            ("SERP_HOST", "  "),
            ("SERP_USERNAME", "u"),
            ("SERP_PASSWORD", "p"),
        ]);
        let err = ProxyConfig::from_lookup(SERP_PREFIX, lookup).unwrap_err();
        assert_eq!(err.target, "SERP_HOST");
    }

    #[test]
    fn debug_redacts_secrets() {
        let proxy = ProxyConfig::new("h", "u", "hunter2");
        let config = SearchConfig::new("https://serp.test")
            .with_proxy(proxy.clone())
            .with_api_key("key-123");
        assert!(!format!("{:?}", proxy).contains("hunter2"));
        let shown = format!("{:?}", config);
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("key-123"));
    }

    #[test]
    fn search_config_from_lookup() {
        let lookup = lookup_from(&[
            ("SERP_HOST", "serp.test"),
            ("SERP_USERNAME", "u"),
            ("SERP_PASSWORD", "p"),
            ("SERP_API_KEY", "k"),
        ]);
        let config = SearchConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.endpoint, "https://serp.test");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.k, DEFAULT_RESULT_COUNT);
        assert_eq!(config.gl, "us");
        assert_eq!(config.hl, "en");
        assert_eq!(config.request_url(), "https://serp.test/search");
    }

    #[test]
    fn explicit_endpoint_wins() {
        let lookup = lookup_from(&[
            ("SERP_HOST", "proxy.test"),
            ("SERP_USERNAME", "u"),
            ("SERP_PASSWORD", "p"),
            ("SERP_ENDPOINT", "http://api.test/v1/"),
        ]);
        let config = SearchConfig::from_lookup(lookup)
            .unwrap()
            .with_search_type(SearchType::News);
        assert_eq!(config.request_url(), "http://api.test/v1/news");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn direct_config_without_proxy() {
        let lookup = lookup_from(&[("SERP_API_KEY", "k")]);
        let config = SearchConfig::direct_from_lookup("http://127.0.0.1:9000", lookup).unwrap();
        assert!(config.proxy.is_none());
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.request_url(), "http://127.0.0.1:9000/search");
    }

    #[test]
    fn direct_config_attaches_complete_proxy() {
        let lookup = lookup_from(&[
            ("SERP_HOST", "proxy.test"),
            ("SERP_USERNAME", "u"),
            ("SERP_PASSWORD", "p"),
        ]);
        let config = SearchConfig::direct_from_lookup("http://api.test", lookup).unwrap();
        assert_eq!(config.proxy, Some(ProxyConfig::new("proxy.test", "u", "p")));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn direct_config_rejects_partial_proxy() {
        let lookup = lookup_from(&[("SERP_HOST", "proxy.test")]);
        let err = SearchConfig::direct_from_lookup("http://api.test", lookup).unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.target, "SERP_USERNAME");
    }

    #[test]
    fn search_type_parsing_and_keys() {
        assert_eq!(SearchType::from("NEWS"), SearchType::News);
        assert_eq!(SearchType::from("unknown"), SearchType::Search);
        assert_eq!(SearchType::Search.result_key(), "organic");
        assert_eq!(SearchType::Images.result_key(), "images");
        assert_eq!(SearchType::Places.to_string(), "places");
    }
}
