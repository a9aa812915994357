//! Fetch dispatcher applying one caching strategy per resource class.
//!
//! The dispatcher intercepts every outgoing request, classifies it, and
//! serves it with one of four strategies:
//!
//! - API: network-first, cache fallback, synthesized offline JSON
//! - Tile: cache-first with a bounded passive cache, empty tile offline
//! - CDN/fonts: cache-first across shell versions, backfill current shell
//! - App shell: pure cache-first, no caching side effect
//!
//! `handle` is total: network and cache failures become fallback responses,
//! never errors. Cache population happens on detached tasks after the
//! response is returned (write-after-respond); a write that fails or never
//! lands is dropped silently, which is the accepted trade-off for not
//! blocking the caller.

use std::sync::Arc;

use crate::classify::{ResourceClass, RouteTable, classify};
use crate::fetch::Fetcher;
use crate::serve::{CacheRequest, ServedResponse};
use trailguide_core::cache::{API_PARTITION, TILE_PARTITION};
use trailguide_core::{AppConfig, CacheDb, StoredResponse};

/// Routes intercepted requests to their caching strategy.
pub struct Dispatcher {
    db: CacheDb,
    fetcher: Arc<dyn Fetcher>,
    routes: RouteTable,
    shell_partition: String,
    tile_cache_cap: u64,
}

impl Dispatcher {
    pub fn new(db: CacheDb, fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self {
            db,
            fetcher,
            routes: RouteTable::from_config(config),
            shell_partition: config.shell_partition(),
            tile_cache_cap: config.tile_cache_cap,
        }
    }

    /// Serve an intercepted request. Never fails; every path resolves to a
    /// response.
    pub async fn handle(&self, req: &CacheRequest) -> ServedResponse {
        let class = classify(&req.url, &self.routes);
        tracing::debug!(url = %req.url, ?class, "dispatching request");

        match class {
            ResourceClass::Api => self.network_first(req).await,
            ResourceClass::Tile => self.tile_cache_first(req).await,
            ResourceClass::CdnShell => self.cdn_cache_first(req).await,
            ResourceClass::OtherShell => self.passive_cache_first(req).await,
        }
    }

    /// API: try the network, fall back to the cache, then to a synthesized
    /// offline payload. A successful response is copied into the api
    /// partition without blocking the caller.
    async fn network_first(&self, req: &CacheRequest) -> ServedResponse {
        match self.fetcher.fetch(&req.url).await {
            Ok(resp) => {
                if resp.is_success() {
                    self.spawn_put(API_PARTITION.to_string(), resp.to_stored(&req.vary_headers));
                }
                ServedResponse::from_network(&resp)
            }
            Err(e) => {
                tracing::debug!(url = %req.url, error = %e, "api fetch failed, trying cache");
                match self.db.get(API_PARTITION, &req.cache_key()).await {
                    Ok(Some(entry)) => ServedResponse::from_cache(entry),
                    Ok(None) => ServedResponse::offline_api(),
                    Err(e) => {
                        tracing::debug!(url = %req.url, error = %e, "api cache lookup failed");
                        ServedResponse::offline_api()
                    }
                }
            }
        }
    }

    /// Tiles: serve from the tile partition when present; otherwise fetch
    /// and cache the tile only while the partition is under the cap. Offline
    /// misses become an empty 204 tile.
    async fn tile_cache_first(&self, req: &CacheRequest) -> ServedResponse {
        match self.db.get(TILE_PARTITION, &req.cache_key()).await {
            Ok(Some(entry)) => return ServedResponse::from_cache(entry),
            Ok(None) => {}
            Err(e) => tracing::debug!(url = %req.url, error = %e, "tile cache lookup failed"),
        }

        match self.fetcher.fetch(&req.url).await {
            Ok(resp) => {
                if resp.is_success() {
                    self.spawn_capped_tile_put(resp.to_stored(&req.vary_headers));
                }
                ServedResponse::from_network(&resp)
            }
            Err(e) => {
                tracing::debug!(url = %req.url, error = %e, "tile fetch failed, serving blank tile");
                ServedResponse::no_content()
            }
        }
    }

    /// CDN and font resources: a hit in any shell version serves directly;
    /// a miss is fetched and backfilled into the current shell partition.
    async fn cdn_cache_first(&self, req: &CacheRequest) -> ServedResponse {
        match self.db.get_shell(&req.cache_key()).await {
            Ok(Some(entry)) => return ServedResponse::from_cache(entry),
            Ok(None) => {}
            Err(e) => tracing::debug!(url = %req.url, error = %e, "shell cache lookup failed"),
        }

        match self.fetcher.fetch(&req.url).await {
            Ok(resp) => {
                if resp.is_success() {
                    self.spawn_put(self.shell_partition.clone(), resp.to_stored(&req.vary_headers));
                }
                ServedResponse::from_network(&resp)
            }
            Err(e) => {
                tracing::debug!(url = %req.url, error = %e, "cdn fetch failed");
                ServedResponse::no_content()
            }
        }
    }

    /// App shell default: serve from any cache, otherwise pass the network
    /// response straight through with no caching side effect.
    async fn passive_cache_first(&self, req: &CacheRequest) -> ServedResponse {
        match self.db.get_any(&req.cache_key()).await {
            Ok(Some(entry)) => return ServedResponse::from_cache(entry),
            Ok(None) => {}
            Err(e) => tracing::debug!(url = %req.url, error = %e, "cache lookup failed"),
        }

        match self.fetcher.fetch(&req.url).await {
            Ok(resp) => ServedResponse::from_network(&resp),
            Err(e) => {
                tracing::debug!(url = %req.url, error = %e, "shell fetch failed");
                ServedResponse::no_content()
            }
        }
    }

    /// Fire-and-forget cache write. The entry holds its own copy of the
    /// body; the response has already gone back to the caller.
    fn spawn_put(&self, partition: String, entry: StoredResponse) {
        let db = self.db.clone();
        tokio::spawn(async move {
            if let Err(e) = db.put(&partition, &entry).await {
                tracing::debug!(partition = %partition, error = %e, "dropped cache write");
            }
        });
    }

    /// Fire-and-forget tile write that honors the passive cache cap.
    fn spawn_capped_tile_put(&self, entry: StoredResponse) {
        let db = self.db.clone();
        let cap = self.tile_cache_cap;
        tokio::spawn(async move {
            match db.count(TILE_PARTITION).await {
                Ok(count) if count < cap => {
                    if let Err(e) = db.put(TILE_PARTITION, &entry).await {
                        tracing::debug!(error = %e, "dropped tile cache write");
                    }
                }
                Ok(count) => tracing::debug!(count, cap, "tile cache full, not caching tile"),
                Err(e) => tracing::debug!(error = %e, "tile count failed, not caching tile"),
            }
        });
    }
}
