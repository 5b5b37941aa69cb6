// ABOUTME: Single-attempt HTTP fetching of a page and charset-aware body decoding.
// ABOUTME: Non-success statuses are failures; bodies are decoded via Content-Type charset or detection.

use bytes::Bytes;
use tracing::debug;

use crate::error::ScrapeError;

/// Maximum allowed body length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Result of a successful fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text, using the charset from the Content-Type header when present.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_url(url: &str, op: &str) -> Result<url::Url, ScrapeError> {
    if url.is_empty() {
        return Err(ScrapeError::invalid_url(url, op, None));
    }
    let parsed = url::Url::parse(url).map_err(|e| {
        ScrapeError::invalid_url(url, op, Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ScrapeError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("scheme must be http or https")),
        )),
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
pub(crate) fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Perform one GET of `url` with `client`.
///
/// Transport failures and oversized bodies are `Fetch` errors; any non-2xx
/// status is a `Status` error.
pub async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<FetchResult, ScrapeError> {
    let response = client.get(url).send().await.map_err(|e| {
        ScrapeError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(ScrapeError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    if !status.is_success() {
        return Err(ScrapeError::status(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }

    let body = response.bytes().await.map_err(|e| {
        ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ScrapeError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    debug!(url, status = status.as_u16(), bytes = body.len(), "fetched page");

    Ok(FetchResult {
        status: status.as_u16(),
        content_type,
        body,
    })
}
