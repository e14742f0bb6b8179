//! Key/value entry operations on the SQLite cache.

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::{CacheEntry, CacheStore};
use crate::Error;

fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl CacheDb {
    /// Get an entry by key, fresh or not.
    ///
    /// Returns None if the key doesn't exist in the cache.
    pub async fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt =
                    conn.prepare("SELECT key, payload, cached_at, ttl_seconds FROM cache_entries WHERE key = ?1")?;

                let result = stmt.query_row(params![key], |row| {
                    Ok(CacheEntry {
                        key: row.get(0)?,
                        payload: row.get(1)?,
                        cached_at: row.get(2)?,
                        ttl_seconds: row.get(3)?,
                    })
                });

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get a fresh entry's payload by key.
    ///
    /// Returns None if the key doesn't exist or has expired.
    pub async fn get_fresh(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT payload FROM cache_entries
                    WHERE key = ?1
                    AND (expires_at IS NULL OR expires_at > ?2)",
                )?;

                match stmt.query_row(params![key, now], |row| row.get(0)) {
                    Ok(payload) => Ok(Some(payload)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update an entry.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, updates all fields if it does.
    pub async fn put_entry(&self, key: &str, payload: &str, ttl_secs: Option<u64>) -> Result<(), Error> {
        let key = key.to_string();
        let payload = payload.to_string();

        let now = Utc::now();
        let cached_at = timestamp(now);
        let ttl_seconds = ttl_secs.map(|s| s as i64);
        let expires_at = ttl_seconds.map(|s| timestamp(now + Duration::seconds(s)));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (key, payload, cached_at, ttl_seconds, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key) DO UPDATE SET
                        payload = excluded.payload,
                        cached_at = excluded.cached_at,
                        ttl_seconds = excluded.ttl_seconds,
                        expires_at = excluded.expires_at",
                    params![key, payload, cached_at, ttl_seconds, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(
                    "DELETE FROM cache_entries WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                    params![now],
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_fresh(key).await
    }

    async fn set(&self, key: &str, payload: &str, ttl_secs: Option<u64>) -> Result<(), Error> {
        self.put_entry(key, payload, ttl_secs).await
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn entry(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        self.get_entry(key).await
    }

    async fn purge_expired(&self) -> Result<u64, Error> {
        CacheDb::purge_expired(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("advent_data", r#"{"a":1}"#, Some(3600)).await.unwrap();

        let payload = db.get_fresh("advent_data").await.unwrap().unwrap();
        assert_eq!(payload, r#"{"a":1}"#);

        let entry = db.get_entry("advent_data").await.unwrap().unwrap();
        assert_eq!(entry.ttl_seconds, Some(3600));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.get_fresh("nonexistent").await.unwrap().is_none());
        assert!(db.get_entry("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("short", "1", Some(1)).await.unwrap();
        assert!(db.get_fresh("short").await.unwrap().is_some());

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
        assert!(db.get_fresh("short").await.unwrap().is_none());
        assert!(db.get_entry("short").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_entry_without_ttl_never_expires() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("forever", "1", None).await.unwrap();
        assert_eq!(db.purge_expired().await.unwrap(), 0);
        assert!(db.get_fresh("forever").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("expiring", "1", Some(1)).await.unwrap();
        db.put_entry("fresh", "2", Some(3600)).await.unwrap();

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        let deleted = db.purge_expired().await.unwrap();
        assert_eq!(deleted, 1);
        assert!(db.get_entry("expiring").await.unwrap().is_none());
        assert!(db.get_entry("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_replaces_payload() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("key", "old", Some(3600)).await.unwrap();
        db.put_entry("key", "new", Some(3600)).await.unwrap();
        assert_eq!(db.get_fresh("key").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_cache_store_trait_object() {
        let store: Box<dyn CacheStore> = Box::new(CacheDb::open_in_memory().await.unwrap());
        store.set("k", "\"v\"", Some(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("\"v\""));
        assert_eq!(store.name(), "sqlite");

        let entry = store.entry("k").await.unwrap().unwrap();
        assert_eq!(entry.ttl_seconds, Some(60));

        store.set("gone", "1", Some(0)).await.unwrap();
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.entry("gone").await.unwrap().is_none());
    }
}
