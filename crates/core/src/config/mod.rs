//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (TRAILGUIDE_*)
//! 2. TOML config file (if TRAILGUIDE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

use crate::cache::shell_partition;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TRAILGUIDE_*)
/// 2. TOML config file (if TRAILGUIDE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// NPS API key for the proxy endpoints.
    ///
    /// Set via TRAILGUIDE_NPS_API_KEY environment variable.
    /// Required only when a proxy request is served.
    #[serde(default)]
    pub nps_api_key: Option<String>,

    /// Path to the SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Shell version; bumping it retires the previous shell partition
    /// on the next activation.
    #[serde(default = "default_shell_version")]
    pub shell_version: u32,

    /// Base URL used to resolve relative manifest entries and requests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Listen address for the proxy binary.
    #[serde(default = "default_proxy_addr")]
    pub proxy_addr: String,

    /// Path prefix identifying proxied API requests.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Hostnames (substring match) of the map-tile provider.
    #[serde(default = "default_tile_hosts")]
    pub tile_hosts: Vec<String>,

    /// Hostnames (substring match) of CDNs serving shell resources.
    #[serde(default = "default_cdn_hosts")]
    pub cdn_hosts: Vec<String>,

    /// Hostnames (substring match) of font-hosting domains.
    #[serde(default = "default_font_hosts")]
    pub font_hosts: Vec<String>,

    /// Max tiles kept by the passive caching path (prevents storage bloat).
    /// The user-triggered bulk prefetch is exempt.
    #[serde(default = "default_tile_cache_cap")]
    pub tile_cache_cap: u64,

    /// Max tile URLs accepted per CACHE_TILES message; excess is dropped.
    #[serde(default = "default_prefetch_max_tiles")]
    pub prefetch_max_tiles: usize,

    /// Number of concurrent prefetch cursors.
    #[serde(default = "default_prefetch_workers")]
    pub prefetch_workers: usize,

    /// Delay each cursor waits between tile fetches, in milliseconds.
    #[serde(default = "default_prefetch_delay_ms")]
    pub prefetch_delay_ms: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Ordered manifest of shell asset URLs installed all-or-nothing.
    #[serde(default = "default_shell_manifest")]
    pub shell_manifest: Vec<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./trailguide-cache.sqlite")
}

fn default_shell_version() -> u32 {
    4
}

fn default_base_url() -> String {
    "http://127.0.0.1:8787".into()
}

fn default_proxy_addr() -> String {
    "127.0.0.1:8787".into()
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_tile_hosts() -> Vec<String> {
    vec!["tile.openstreetmap.org".into()]
}

fn default_cdn_hosts() -> Vec<String> {
    vec!["cdnjs.cloudflare.com".into()]
}

fn default_font_hosts() -> Vec<String> {
    vec!["fonts.googleapis.com".into(), "fonts.gstatic.com".into()]
}

fn default_tile_cache_cap() -> u64 {
    2000
}

fn default_prefetch_max_tiles() -> usize {
    200
}

fn default_prefetch_workers() -> usize {
    4
}

fn default_prefetch_delay_ms() -> u64 {
    50
}

fn default_user_agent() -> String {
    "trailguide/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_shell_manifest() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/data/sites.json",
        "/manifest.json",
        "/icons/icon-192.png",
        "/icons/icon-512.png",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.min.css",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.min.js",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.5.3/MarkerCluster.css",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.5.3/MarkerCluster.Default.css",
        "https://cdnjs.cloudflare.com/ajax/libs/leaflet.markercluster/1.5.3/leaflet.markercluster.js",
        "https://fonts.googleapis.com/css2?family=Playfair+Display:ital,wght@0,400;0,700;1,400&family=Source+Sans+3:wght@300;400;600;700&display=swap",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nps_api_key: None,
            db_path: default_db_path(),
            shell_version: default_shell_version(),
            base_url: default_base_url(),
            proxy_addr: default_proxy_addr(),
            api_prefix: default_api_prefix(),
            tile_hosts: default_tile_hosts(),
            cdn_hosts: default_cdn_hosts(),
            font_hosts: default_font_hosts(),
            tile_cache_cap: default_tile_cache_cap(),
            prefetch_max_tiles: default_prefetch_max_tiles(),
            prefetch_workers: default_prefetch_workers(),
            prefetch_delay_ms: default_prefetch_delay_ms(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            shell_manifest: default_shell_manifest(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Per-cursor delay as Duration.
    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }

    /// Name of the shell partition for the configured version.
    pub fn shell_partition(&self) -> String {
        shell_partition(self.shell_version)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `TRAILGUIDE_`
    /// 2. TOML file from `TRAILGUIDE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TRAILGUIDE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("TRAILGUIDE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the NPS API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the NPS API key is not set.
    pub fn require_nps_api_key(&self) -> Result<&str, ConfigError> {
        self.nps_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "nps_api_key".into(),
            hint: "Set TRAILGUIDE_NPS_API_KEY environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./trailguide-cache.sqlite"));
        assert_eq!(config.api_prefix, "/api/");
        assert_eq!(config.tile_cache_cap, 2000);
        assert_eq!(config.prefetch_max_tiles, 200);
        assert_eq!(config.prefetch_workers, 4);
        assert_eq!(config.prefetch_delay_ms, 50);
        assert_eq!(config.shell_partition(), "shell-v4");
        assert_eq!(config.shell_manifest.len(), 12);
        assert!(config.nps_api_key.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.prefetch_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_require_nps_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_nps_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_nps_api_key_present() {
        let config = AppConfig { nps_api_key: Some("test-key".into()), ..Default::default() };
        let result = config.require_nps_api_key();
        assert_eq!(result.unwrap(), "test-key");
    }
}
