//! Partitioned response store operations.
//!
//! Provides functions for storing, reading, counting, and deleting
//! cached response snapshots across named partitions.

use super::SHELL_PREFIX;
use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached response snapshot.
///
/// Entries are immutable once written; a later put for the same key
/// replaces the whole row (last writer wins). Insertion order is kept
/// via `stored_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub key: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub headers_json: Option<String>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

fn row_to_response(row: &rusqlite::Row<'_>) -> Result<StoredResponse, rusqlite::Error> {
    Ok(StoredResponse {
        key: row.get(0)?,
        url: row.get(1)?,
        status: row.get::<_, i64>(2)? as u16,
        content_type: row.get(3)?,
        headers_json: row.get(4)?,
        body: row.get(5)?,
        stored_at: row.get(6)?,
    })
}

const SELECT_COLUMNS: &str = "key, url, status, content_type, headers_json, body, stored_at";

fn insert_row(conn: &rusqlite::Connection, partition: &str, entry: &StoredResponse) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO responses (partition_name, key, url, status, content_type, headers_json, body, stored_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(partition_name, key) DO UPDATE SET
            url = excluded.url,
            status = excluded.status,
            content_type = excluded.content_type,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![
            partition,
            &entry.key,
            &entry.url,
            entry.status as i64,
            &entry.content_type,
            &entry.headers_json,
            &entry.body,
            &entry.stored_at,
        ],
    )?;
    Ok(())
}

impl CacheDb {
    /// Insert or replace a cached response in the given partition.
    ///
    /// The partition comes into existence with its first entry.
    pub async fn put(&self, partition: &str, entry: &StoredResponse) -> Result<(), Error> {
        let partition = partition.to_string();
        let entry = entry.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                insert_row(conn, &partition, &entry)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert a batch of responses into one partition, all or nothing.
    ///
    /// Runs in a single transaction so a failure publishes no entries.
    pub async fn put_all(&self, partition: &str, entries: Vec<StoredResponse>) -> Result<(), Error> {
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction().map_err(Error::from)?;
                for entry in &entries {
                    insert_row(&tx, &partition, entry)?;
                }
                tx.commit().map_err(Error::from)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a response by key from one partition.
    ///
    /// Returns None if the key isn't present in that partition.
    pub async fn get(&self, partition: &str, key: &str) -> Result<Option<StoredResponse>, Error> {
        let partition = partition.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let sql = format!("SELECT {SELECT_COLUMNS} FROM responses WHERE partition_name = ?1 AND key = ?2");
                let result = conn.query_row(&sql, params![partition, key], row_to_response);
                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get a response by key from any partition, newest copy first.
    pub async fn get_any(&self, key: &str) -> Result<Option<StoredResponse>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM responses WHERE key = ?1
                     ORDER BY stored_at DESC LIMIT 1"
                );
                let result = conn.query_row(&sql, params![key], row_to_response);
                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get a response by key from any shell-versioned partition.
    ///
    /// Looks across every partition whose name carries the shell prefix, so
    /// assets installed by a previous worker version still count as hits.
    pub async fn get_shell(&self, key: &str) -> Result<Option<StoredResponse>, Error> {
        let key = key.to_string();
        let pattern = format!("{SHELL_PREFIX}%");
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM responses
                     WHERE key = ?1 AND partition_name LIKE ?2
                     ORDER BY stored_at DESC LIMIT 1"
                );
                let result = conn.query_row(&sql, params![key, pattern], row_to_response);
                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Count entries in one partition.
    pub async fn count(&self, partition: &str) -> Result<u64, Error> {
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM responses WHERE partition_name = ?1",
                        params![partition],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// List every partition name currently holding entries.
    pub async fn partition_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn
                    .prepare("SELECT DISTINCT partition_name FROM responses ORDER BY partition_name")
                    .map_err(Error::from)?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(Error::from)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(Error::from)?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a whole partition.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_partition(&self, partition: &str) -> Result<u64, Error> {
        let partition = partition.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM responses WHERE partition_name = ?1",
                    params![partition],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
