//! Bulk tile prefetch for offline regions.
//!
//! The application asks the worker to warm the tile cache for a region
//! before the user goes offline. The submitted URL list is truncated to a
//! fixed budget, then drained by a small pool of cursors sharing one atomic
//! position counter: a cursor claims the next index, fetches that tile,
//! stores it, waits a throttle delay, and claims again. Claim-then-fetch
//! ordering guarantees each list position is fetched by exactly one cursor.
//!
//! Failures are skips, not retries, and there is no completion signal: the
//! job is fire-and-forget from the requester's point of view.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;

use crate::fetch::Fetcher;
use trailguide_core::cache::TILE_PARTITION;
use trailguide_core::{AppConfig, CacheDb};

/// Drains a submitted tile list into the tile partition.
#[derive(Clone)]
pub struct PrefetchCoordinator {
    db: CacheDb,
    fetcher: Arc<dyn Fetcher>,
    max_tiles: usize,
    workers: usize,
    delay: Duration,
}

impl PrefetchCoordinator {
    pub fn new(db: CacheDb, fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self {
            db,
            fetcher,
            max_tiles: config.prefetch_max_tiles,
            workers: config.prefetch_workers,
            delay: config.prefetch_delay(),
        }
    }

    /// Prefetch a list of tile URLs.
    ///
    /// The list is truncated to the configured budget; the excess is
    /// dropped silently. Duplicates are fetched independently. Tiles are
    /// stored unconditionally - this user-triggered bulk load is exempt
    /// from the passive cache cap. Returns once every cursor has drained
    /// its share; callers that don't care can spawn it and move on.
    pub async fn run(&self, mut tiles: Vec<String>) {
        tiles.truncate(self.max_tiles);
        if tiles.is_empty() {
            return;
        }

        tracing::info!(tiles = tiles.len(), cursors = self.workers, "starting tile prefetch");

        let tiles = Arc::new(tiles);
        let cursor = Arc::new(AtomicUsize::new(0));
        let mut set = JoinSet::new();

        for _ in 0..self.workers {
            let tiles = Arc::clone(&tiles);
            let cursor = Arc::clone(&cursor);
            let db = self.db.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let delay = self.delay;

            set.spawn(async move {
                loop {
                    // Claim before fetching so no two cursors take the same
                    // position.
                    let claimed = cursor.fetch_add(1, Ordering::SeqCst);
                    if claimed >= tiles.len() {
                        break;
                    }

                    let url = &tiles[claimed];
                    match fetcher.fetch(url).await {
                        Ok(resp) if resp.is_success() => {
                            if let Err(e) = db.put(TILE_PARTITION, &resp.to_stored("")).await {
                                tracing::debug!(url = %url, error = %e, "prefetch store failed, skipping");
                            }
                        }
                        Ok(resp) => {
                            tracing::debug!(url = %url, status = resp.status, "prefetch skipped error status");
                        }
                        Err(e) => {
                            tracing::debug!(url = %url, error = %e, "prefetch fetch failed, skipping");
                        }
                    }

                    tokio::time::sleep(delay).await;
                }
            });
        }

        while set.join_next().await.is_some() {}

        tracing::info!("tile prefetch finished");
    }
}
