//! HTTP fetch seam for the caching worker.
//!
//! All strategies go through the [`Fetcher`] trait so the dispatcher,
//! lifecycle manager, and prefetch coordinator can be exercised without a
//! network. [`HttpFetcher`] is the production implementation on reqwest.
//!
//! A fetch distinguishes transport failures (connection, DNS, timeout) from
//! HTTP error statuses: only the former are `Err`. A 404 is still a
//! response the strategies may want to pass through to the caller.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url, header};
use std::time::Instant;

use trailguide_core::cache::hash::compute_cache_key;
use trailguide_core::{AppConfig, Error, StoredResponse};

/// A fetched network response snapshot.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// The URL that was fetched.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header.
    pub content_type: Option<String>,
    /// Response headers as (name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Bytes,
}

impl FetchedResponse {
    /// Whether the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Snapshot this response into a storable cache entry.
    ///
    /// The body is copied; the original response stays intact for the
    /// caller it is also being returned to.
    pub fn to_stored(&self, vary_headers: &str) -> StoredResponse {
        StoredResponse {
            key: compute_cache_key(&self.url, vary_headers),
            url: self.url.clone(),
            status: self.status,
            content_type: self.content_type.clone(),
            headers_json: serde_json::to_string(&self.headers).ok(),
            body: self.body.to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Abstraction over the network boundary.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a URL, returning the response snapshot.
    ///
    /// Relative URLs are resolved against the implementation's base URL.
    /// Errors only on transport failure, never on HTTP error statuses.
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, Error>;
}

/// HTTP fetcher backed by reqwest.
pub struct HttpFetcher {
    http: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Create a new fetcher from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn resolve(&self, url: &str) -> Result<Url, Error> {
        // join() handles both absolute and app-relative URLs
        self.base_url
            .join(url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, Error> {
        let start = Instant::now();
        let target = self.resolve(url)?;

        let response = self
            .http
            .get(target)
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("network error: {}", e)))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), String::from_utf8_lossy(value.as_bytes()).to_string()))
            .collect();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read response: {}", e)))?;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            status,
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(FetchedResponse { url: url.to_string(), status, content_type, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let mut resp = FetchedResponse {
            url: "https://example.com".into(),
            status: 200,
            content_type: None,
            headers: Vec::new(),
            body: Bytes::new(),
        };
        assert!(resp.is_success());

        resp.status = 204;
        assert!(resp.is_success());

        resp.status = 404;
        assert!(!resp.is_success());
    }

    #[test]
    fn test_to_stored_copies_body() {
        let resp = FetchedResponse {
            url: "https://tile.openstreetmap.org/1/0/0.png".into(),
            status: 200,
            content_type: Some("image/png".into()),
            headers: vec![("etag".into(), "\"abc\"".into())],
            body: Bytes::from_static(b"pixels"),
        };

        let stored = resp.to_stored("");
        assert_eq!(stored.body, b"pixels");
        assert_eq!(stored.status, 200);
        assert_eq!(stored.key, compute_cache_key(&resp.url, ""));
        // original untouched
        assert_eq!(resp.body, Bytes::from_static(b"pixels"));
    }

    #[test]
    fn test_http_fetcher_resolves_relative() {
        let config = AppConfig::default();
        let fetcher = HttpFetcher::new(&config).unwrap();

        let resolved = fetcher.resolve("/api/alerts?parkCode=yose").unwrap();
        assert_eq!(resolved.as_str(), "http://127.0.0.1:8787/api/alerts?parkCode=yose");

        let absolute = fetcher.resolve("https://tile.openstreetmap.org/1/0/0.png").unwrap();
        assert_eq!(absolute.host_str(), Some("tile.openstreetmap.org"));
    }
}
