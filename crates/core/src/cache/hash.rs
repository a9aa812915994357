//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute a content-addressed cache key for a request.
///
/// The key covers the canonical request URL plus any headers the response
/// varies on, so two requests differing only in their vary headers cache
/// independently.
pub fn compute_cache_key(url: &str, vary_headers: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(vary_headers.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("https://tile.openstreetmap.org/12/654/1583.png", "");
        let hash2 = compute_cache_key("https://tile.openstreetmap.org/12/654/1583.png", "");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_urls() {
        let hash1 = compute_cache_key("/api/alerts?parkCode=yose", "");
        let hash2 = compute_cache_key("/api/alerts?parkCode=acad", "");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_headers() {
        let hash1 = compute_cache_key("https://example.com", "gzip");
        let hash2 = compute_cache_key("https://example.com", "br");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("https://example.com", "");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
