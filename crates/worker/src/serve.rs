//! Request and response types for the serve path.
//!
//! Every strategy resolves to a [`ServedResponse`]; a network or cache
//! failure is converted into a synthesized fallback, never surfaced as an
//! error to the calling page.

use bytes::Bytes;

use crate::fetch::FetchedResponse;
use trailguide_core::StoredResponse;
use trailguide_core::cache::hash::compute_cache_key;

/// Synthesized body for API requests that fail offline with no cached copy.
pub const OFFLINE_API_BODY: &str = r#"{"error":"Offline","alerts":[]}"#;

/// An intercepted outgoing request.
#[derive(Debug, Clone)]
pub struct CacheRequest {
    /// Absolute URL or app-relative path.
    pub url: String,
    /// Headers the cached response varies on, canonicalized to one string.
    pub vary_headers: String,
}

impl CacheRequest {
    /// A plain GET request with no vary headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into(), vary_headers: String::new() }
    }

    /// Cache key for this request.
    pub fn cache_key(&self) -> String {
        compute_cache_key(&self.url, &self.vary_headers)
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Fresh network response.
    Network,
    /// Cached snapshot.
    Cache,
    /// Synthesized offline placeholder.
    Fallback,
}

/// The response handed back to the caller. Always a valid response value.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub source: ServeSource,
}

impl ServedResponse {
    /// Pass a network response through to the caller.
    pub fn from_network(resp: &FetchedResponse) -> Self {
        Self {
            status: resp.status,
            content_type: resp.content_type.clone(),
            headers: resp.headers.clone(),
            body: resp.body.clone(),
            source: ServeSource::Network,
        }
    }

    /// Serve a cached snapshot.
    pub fn from_cache(entry: StoredResponse) -> Self {
        let headers = entry
            .headers_json
            .as_deref()
            .and_then(|j| serde_json::from_str(j).ok())
            .unwrap_or_default();
        Self {
            status: entry.status,
            content_type: entry.content_type,
            headers,
            body: Bytes::from(entry.body),
            source: ServeSource::Cache,
        }
    }

    /// Offline fallback for API requests: a well-formed empty alerts payload.
    pub fn offline_api() -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".into()),
            headers: Vec::new(),
            body: Bytes::from_static(OFFLINE_API_BODY.as_bytes()),
            source: ServeSource::Fallback,
        }
    }

    /// Offline fallback for everything else: an empty no-content response.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            content_type: None,
            headers: Vec::new(),
            body: Bytes::new(),
            source: ServeSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_api_body_shape() {
        let resp = ServedResponse::offline_api();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type.as_deref(), Some("application/json"));
        assert_eq!(resp.body, Bytes::from_static(br#"{"error":"Offline","alerts":[]}"#));
        assert_eq!(resp.source, ServeSource::Fallback);
    }

    #[test]
    fn test_no_content_fallback() {
        let resp = ServedResponse::no_content();
        assert_eq!(resp.status, 204);
        assert!(resp.body.is_empty());
        assert_eq!(resp.source, ServeSource::Fallback);
    }

    #[test]
    fn test_request_cache_key_matches_hash() {
        let req = CacheRequest::get("/api/alerts?parkCode=yose");
        assert_eq!(req.cache_key(), compute_cache_key("/api/alerts?parkCode=yose", ""));
    }

    #[test]
    fn test_from_cache_restores_headers() {
        let entry = StoredResponse {
            key: "k".into(),
            url: "/index.html".into(),
            status: 200,
            content_type: Some("text/html".into()),
            headers_json: Some(r#"[["etag","\"abc\""]]"#.into()),
            body: b"<html>".to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        };

        let resp = ServedResponse::from_cache(entry);
        assert_eq!(resp.source, ServeSource::Cache);
        assert_eq!(resp.headers, vec![("etag".to_string(), "\"abc\"".to_string())]);
    }
}
