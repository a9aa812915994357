//! SQLite-backed cache partitions for offline response snapshots.
//!
//! This module provides a persistent key-to-response store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Named partitions (shell, tiles, api) sharing one database file
//! - Content-addressed keys using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Partition enumeration and deletion for version cleanup

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod responses;

pub use crate::Error;

pub use connection::CacheDb;
pub use responses::StoredResponse;

/// Prefix shared by every versioned shell partition.
pub const SHELL_PREFIX: &str = "shell-v";

/// Partition holding map tiles. Survives shell version upgrades.
pub const TILE_PARTITION: &str = "tiles-v1";

/// Partition holding proxied API responses. Survives shell version upgrades.
pub const API_PARTITION: &str = "api-v1";

/// Name of the shell partition for a given shell version.
pub fn shell_partition(version: u32) -> String {
    format!("{SHELL_PREFIX}{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_partition_name() {
        assert_eq!(shell_partition(4), "shell-v4");
        assert!(shell_partition(12).starts_with(SHELL_PREFIX));
    }

    #[test]
    fn test_fixed_partitions_not_shell_named() {
        assert!(!TILE_PARTITION.starts_with(SHELL_PREFIX));
        assert!(!API_PARTITION.starts_with(SHELL_PREFIX));
    }
}
