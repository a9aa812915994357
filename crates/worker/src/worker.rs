//! The caching worker: message loop and serve entry point.
//!
//! One `CacheWorker` instance owns the open cache partitions and wires the
//! dispatcher, lifecycle manager, and prefetch coordinator together. The
//! foreground application talks to it two ways: `serve` for intercepted
//! requests, and a message channel for bulk operations like `CACHE_TILES`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::dispatch::Dispatcher;
use crate::fetch::Fetcher;
use crate::lifecycle::Lifecycle;
use crate::prefetch::PrefetchCoordinator;
use crate::serve::{CacheRequest, ServedResponse};
use trailguide_core::{AppConfig, CacheDb, Error};

/// Messages the foreground application sends to the worker.
///
/// The wire form carries a `type` discriminator, e.g.
/// `{"type":"CACHE_TILES","tiles":["https://..."]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    /// Warm the tile cache for a region. No reply is sent.
    #[serde(rename = "CACHE_TILES")]
    CacheTiles { tiles: Vec<String> },
}

/// The caching worker instance.
pub struct CacheWorker {
    dispatcher: Dispatcher,
    lifecycle: Lifecycle,
    prefetch: PrefetchCoordinator,
}

impl CacheWorker {
    pub fn new(db: CacheDb, fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(db.clone(), Arc::clone(&fetcher), config),
            lifecycle: Lifecycle::new(db.clone(), Arc::clone(&fetcher), config),
            prefetch: PrefetchCoordinator::new(db, fetcher, config),
        }
    }

    /// Install the shell for this worker version. See [`Lifecycle::install`].
    pub async fn install(&self) -> Result<(), Error> {
        self.lifecycle.install().await
    }

    /// Clean up partitions from prior versions. See [`Lifecycle::activate`].
    pub async fn activate(&self) -> Result<Vec<String>, Error> {
        self.lifecycle.activate().await
    }

    /// Serve an intercepted request through the fetch dispatcher.
    pub async fn serve(&self, req: &CacheRequest) -> ServedResponse {
        self.dispatcher.handle(req).await
    }

    /// Drain the message channel until the sender side closes.
    ///
    /// Each `CACHE_TILES` message starts a detached prefetch job; the loop
    /// keeps handling messages while jobs run, and a job outlives even the
    /// requester going away.
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<WorkerMessage>) {
        while let Some(message) = rx.recv().await {
            match message {
                WorkerMessage::CacheTiles { tiles } => {
                    tracing::debug!(tiles = tiles.len(), "received CACHE_TILES message");
                    let prefetch = self.prefetch.clone();
                    tokio::spawn(async move {
                        prefetch.run(tiles).await;
                    });
                }
            }
        }
    }
}
