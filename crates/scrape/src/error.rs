// ABOUTME: Error types for scraping and search including ErrorCode enum and ScrapeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of scrape failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Config,
    InvalidUrl,
    Fetch,
    Status,
    Search,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Config => "configuration error",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Status => "HTTP status error",
            ErrorCode::Search => "search error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for fetch and search operations.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    /// URL, query or setting the failure is about.
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pagechunk: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    fn new(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Config error.
    pub fn config(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Config, target, op, source)
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, target, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, target, op, source)
    }

    /// Create a Status error.
    pub fn status(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Status, target, op, source)
    }

    /// Create a Search error.
    pub fn search(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Search, target, op, source)
    }

    /// Returns true if this is a Config error.
    pub fn is_config(&self) -> bool {
        self.code == ErrorCode::Config
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Status error.
    pub fn is_status(&self) -> bool {
        self.code == ErrorCode::Status
    }

    /// Returns true if this is a Search error.
    pub fn is_search(&self) -> bool {
        self.code == ErrorCode::Search
    }

    /// Whether another attempt at the same request could succeed.
    ///
    /// Bad input and bad configuration fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::Fetch | ErrorCode::Status)
    }
}
