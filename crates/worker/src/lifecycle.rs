//! Worker lifecycle: shell install and partition cleanup on activation.
//!
//! Install populates the current-version shell partition from the asset
//! manifest, all or nothing. Activate retires shell partitions left behind
//! by earlier versions while never touching the tile and api partitions,
//! then the worker takes over serving immediately.

use std::sync::Arc;

use crate::fetch::Fetcher;
use trailguide_core::cache::{API_PARTITION, TILE_PARTITION};
use trailguide_core::{AppConfig, CacheDb, Error};

/// Brings a new worker version online without disrupting tiles or API data.
pub struct Lifecycle {
    db: CacheDb,
    fetcher: Arc<dyn Fetcher>,
    shell_partition: String,
    manifest: Vec<String>,
}

impl Lifecycle {
    pub fn new(db: CacheDb, fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self { db, fetcher, shell_partition: config.shell_partition(), manifest: config.shell_manifest.clone() }
    }

    /// Fetch every manifest asset and publish the shell in one transaction.
    ///
    /// Any unreachable asset aborts the install with nothing written, so a
    /// partial shell is never published and the previous worker version
    /// stays active. On success the new version is ready to activate
    /// immediately.
    pub async fn install(&self) -> Result<(), Error> {
        let mut entries = Vec::with_capacity(self.manifest.len());

        for url in &self.manifest {
            let resp = self
                .fetcher
                .fetch(url)
                .await
                .map_err(|e| Error::InstallFailed(format!("{}: {}", url, e)))?;

            if !resp.is_success() {
                return Err(Error::InstallFailed(format!("{}: status {}", url, resp.status)));
            }

            entries.push(resp.to_stored(""));
        }

        self.db.put_all(&self.shell_partition, entries).await?;

        tracing::info!(
            partition = %self.shell_partition,
            assets = self.manifest.len(),
            "shell installed, skipping wait for activation"
        );

        Ok(())
    }

    /// Delete every partition that is not the current shell, tile, or api
    /// partition.
    ///
    /// Tiles are expensive to re-fetch and the api partition ages out via
    /// the proxy's cache headers, so only stale shell versions are retired.
    /// Idempotent: with no stale partitions this deletes nothing. Returns
    /// the deleted partition names.
    pub async fn activate(&self) -> Result<Vec<String>, Error> {
        let keep = [self.shell_partition.as_str(), TILE_PARTITION, API_PARTITION];
        let mut deleted = Vec::new();

        for name in self.db.partition_names().await? {
            if !keep.contains(&name.as_str()) {
                let entries = self.db.delete_partition(&name).await?;
                tracing::info!(partition = %name, entries, "deleted stale cache partition");
                deleted.push(name);
            }
        }

        tracing::info!(partition = %self.shell_partition, "worker activated, claiming clients");

        Ok(deleted)
    }
}
