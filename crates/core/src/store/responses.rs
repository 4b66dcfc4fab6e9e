//! Response cache operations.
//!
//! Stores serialized pipeline responses keyed by [`compute_cache_key`]
//! with a TTL and least-recently-hit eviction.
//!
//! [`compute_cache_key`]: super::hash::compute_cache_key

use super::connection::Store;
use crate::Error;
use chrono::{Duration, SecondsFormat, Utc};
use tokio_rusqlite::{params, rusqlite};

// Fixed-width timestamps so lexicographic order matches chronological order.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Store {
    /// Get a fresh cached response by key and mark it as recently used.
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub async fn get_response(&self, key_hash: &str) -> Result<Option<String>, Error> {
        let key_hash = key_hash.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT response_json FROM response_cache WHERE key_hash = ?1 AND expires_at > ?2",
                    params![key_hash, now],
                    |row| row.get::<_, String>(0),
                );

                match result {
                    Ok(json) => {
                        conn.execute(
                            "UPDATE response_cache SET last_hit_at = ?2 WHERE key_hash = ?1",
                            params![key_hash, now],
                        )?;
                        Ok(Some(json))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a cached response.
    pub async fn put_response(
        &self, key_hash: &str, namespace: &str, response_json: &str, ttl_seconds: i64,
    ) -> Result<(), Error> {
        if !super::hash::is_valid_key(key_hash) {
            return Err(Error::InvalidHash);
        }

        let key_hash = key_hash.to_string();
        let namespace = namespace.to_string();
        let response_json = response_json.to_string();

        let now = Utc::now();
        let fetched_at = timestamp(now);
        let expires_at = timestamp(now + Duration::seconds(ttl_seconds));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO response_cache (key_hash, namespace, response_json, fetched_at, expires_at, last_hit_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?4)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        namespace = excluded.namespace,
                        response_json = excluded.response_json,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at,
                        last_hit_at = excluded.last_hit_at",
                    params![key_hash, namespace, response_json, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired cache entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_responses(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM response_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Evict least-recently-hit entries until at most `max_entries` remain.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_lru_responses(&self, max_entries: usize) -> Result<u64, Error> {
        let max = max_entries as i64;
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM response_cache", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM response_cache WHERE key_hash IN (
                    SELECT key_hash FROM response_cache ORDER BY last_hit_at ASC, rowid ASC LIMIT ?1
                )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}
