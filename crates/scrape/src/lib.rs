// ABOUTME: Library entry point for proxied page fetching and web search.
// ABOUTME: Re-exports Fetcher, SearchClient, configuration structs, MemoCache and ScrapeError.

//! Pagechunk scrape - network collaborators for the chunker.
//!
//! [`Fetcher`] downloads pages through an authenticated proxy with bounded
//! retries and memoized results; [`SearchClient`] queries a search backend and
//! turns its JSON into readable snippets.
//!
//! # Example
//!
//! ```no_run
//! use pagechunk_chunker::Chunker;
//! use pagechunk_scrape::{Fetcher, ProxyConfig, ScrapeError, DEFAULT_RETRIES, UNBLOCKER_PREFIX};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let fetcher = Fetcher::builder()
//!         .proxy(ProxyConfig::from_env(UNBLOCKER_PREFIX)?)
//!         .build()?;
//!     let chunker = Chunker::builder().max_size(2000).build();
//!     let chunks = fetcher
//!         .scrape_chunks("https://example.com", DEFAULT_RETRIES, &chunker)
//!         .await?;
//!     println!("{} chunks", chunks.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod options;
pub mod resource;
pub mod search;

pub use crate::cache::MemoCache;
pub use crate::config::{ProxyConfig, SearchConfig, SearchType, SERP_PREFIX, UNBLOCKER_PREFIX};
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::fetcher::{Fetcher, DEFAULT_RETRIES};
pub use crate::options::{FetchOptions, FetcherBuilder, HttpOptions};
pub use crate::search::{SearchClient, SnippetStyle, NO_DIGEST_RESULTS, NO_RESULTS};
