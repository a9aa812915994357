//! Request classification.
//!
//! Maps an outgoing request URL to the caching strategy that will serve it.
//! Classification is a pure function over the routing table; the four
//! patterns (API path prefix, tile host, CDN hosts, font hosts) are literal
//! substring/prefix matches.

use trailguide_core::AppConfig;
use url::Url;

/// Resource classes, one per caching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Proxied API request: network-first with cache fallback.
    Api,
    /// Map tile: cache-first with a bounded passive cache.
    Tile,
    /// CDN or font resource: cache-first with shell backfill.
    CdnShell,
    /// Everything else (app shell): pure cache-first.
    OtherShell,
}

/// The routing table evaluated per request.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pub api_prefix: String,
    pub tile_hosts: Vec<String>,
    pub cdn_hosts: Vec<String>,
    pub font_hosts: Vec<String>,
}

impl RouteTable {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_prefix: config.api_prefix.clone(),
            tile_hosts: config.tile_hosts.clone(),
            cdn_hosts: config.cdn_hosts.clone(),
            font_hosts: config.font_hosts.clone(),
        }
    }
}

fn host_matches(host: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| host.contains(p.as_str()))
}

/// Classify a request URL.
///
/// Accepts both absolute URLs and app-relative paths; anything that matches
/// no special class falls through to [`ResourceClass::OtherShell`].
pub fn classify(url: &str, routes: &RouteTable) -> ResourceClass {
    match Url::parse(url) {
        Ok(parsed) => {
            if parsed.path().starts_with(&routes.api_prefix) {
                return ResourceClass::Api;
            }
            let host = parsed.host_str().unwrap_or("");
            if host_matches(host, &routes.tile_hosts) {
                ResourceClass::Tile
            } else if host_matches(host, &routes.cdn_hosts) || host_matches(host, &routes.font_hosts) {
                ResourceClass::CdnShell
            } else {
                ResourceClass::OtherShell
            }
        }
        // App-relative URL: only the path is available for matching.
        Err(_) => {
            if url.starts_with(&routes.api_prefix) {
                ResourceClass::Api
            } else {
                ResourceClass::OtherShell
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> RouteTable {
        RouteTable::from_config(&AppConfig::default())
    }

    #[test]
    fn test_classify_api_prefix() {
        assert_eq!(classify("/api/alerts?parkCode=yose", &routes()), ResourceClass::Api);
        assert_eq!(
            classify("http://127.0.0.1:8787/api/park-info?parkCode=yose", &routes()),
            ResourceClass::Api
        );
    }

    #[test]
    fn test_classify_tile_host() {
        assert_eq!(
            classify("https://a.tile.openstreetmap.org/12/654/1583.png", &routes()),
            ResourceClass::Tile
        );
        assert_eq!(
            classify("https://tile.openstreetmap.org/12/654/1583.png", &routes()),
            ResourceClass::Tile
        );
    }

    #[test]
    fn test_classify_cdn_and_fonts() {
        assert_eq!(
            classify(
                "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.min.js",
                &routes()
            ),
            ResourceClass::CdnShell
        );
        assert_eq!(
            classify("https://fonts.googleapis.com/css2?family=Playfair+Display", &routes()),
            ResourceClass::CdnShell
        );
        assert_eq!(
            classify("https://fonts.gstatic.com/s/sourcesans3/v15/x.woff2", &routes()),
            ResourceClass::CdnShell
        );
    }

    #[test]
    fn test_classify_default_fall_through() {
        assert_eq!(classify("/index.html", &routes()), ResourceClass::OtherShell);
        assert_eq!(classify("/data/sites.json", &routes()), ResourceClass::OtherShell);
        assert_eq!(
            classify("https://example.com/unrelated.js", &routes()),
            ResourceClass::OtherShell
        );
    }

    #[test]
    fn test_classify_api_wins_over_host() {
        // A tile-host URL whose path happens to start with the API prefix is
        // still an API request, matching the dispatch order of the rules.
        assert_eq!(
            classify("https://tile.openstreetmap.org/api/capabilities", &routes()),
            ResourceClass::Api
        );
    }

    #[test]
    fn test_classify_is_pure() {
        let r = routes();
        let url = "https://tile.openstreetmap.org/1/0/0.png";
        assert_eq!(classify(url, &r), classify(url, &r));
    }
}
