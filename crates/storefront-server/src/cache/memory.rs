//! In-process backing store using Moka.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Bytes;
use glob::Pattern;
use moka::{Expiry, future::Cache, notification::RemovalCause};

use crate::cache::store::{CacheError, CacheStore};
use crate::metrics::CacheMetrics;

#[derive(Debug, Clone)]
struct StoredEntry {
    body: Bytes,
    ttl: Duration,
}

/// Cada entry expira segun su propio TTL; sobrescribir reinicia el TTL.
struct EntryExpiry;

impl Expiry<String, StoredEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Store en memoria, thread-safe y async-friendly.
///
/// La capacidad se mide en bytes (key + body), no en numero de entries.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use axum::body::Bytes;
/// use storefront_server::cache::{CacheStore, MemoryStore};
/// use storefront_server::metrics::CacheMetrics;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new(64 * 1024 * 1024, CacheMetrics::new());
/// store
///     .set("cache:GET:/api/products", Bytes::from_static(b"[]"), Duration::from_secs(120))
///     .await
///     .unwrap();
/// assert!(store.get("cache:GET:/api/products").await.unwrap().is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, StoredEntry>,
    metrics: CacheMetrics,
}

impl MemoryStore {
    pub fn new(max_bytes: u64, metrics: CacheMetrics) -> Self {
        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(max_bytes)
            .weigher(|key: &String, entry: &StoredEntry| {
                u32::try_from(key.len() + entry.body.len()).unwrap_or(u32::MAX)
            })
            .expire_after(EntryExpiry)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Retorna el numero aproximado de entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Bytes ocupados segun el weigher (aproximado hasta el proximo `sync`).
    pub fn weighted_size(&self) -> u64 {
        self.inner.weighted_size()
    }

    /// Fuerza el mantenimiento pendiente (expiraciones, contadores).
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        Ok(self.inner.get(key).await.map(|entry| entry.body))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        self.inner
            .insert(key.to_string(), StoredEntry { body: value, ttl })
            .await;
        self.metrics.update_entry_count(self.inner.entry_count());
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let pattern = Pattern::new(pattern).map_err(|e| CacheError::command("KEYS", e))?;

        // Snapshot: entries pueden cambiar durante la iteracion
        Ok(self
            .inner
            .iter()
            .filter(|(key, _)| pattern.matches(key))
            .map(|(key, _)| key.as_ref().clone())
            .collect())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        let mut removed = 0;
        for key in keys {
            if self.inner.remove(key).await.is_some() {
                removed += 1;
            }
        }
        self.metrics.update_entry_count(self.inner.entry_count());
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(1024 * 1024, CacheMetrics::new())
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_set_and_get() {
        let store = store();
        store
            .set("cache:GET:/api/products", Bytes::from_static(b"{}"), TTL)
            .await
            .unwrap();

        let value = store.get("cache:GET:/api/products").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_missing_key_returns_none() {
        assert!(store().get("cache:GET:/nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let store = store();
        store.set("k", Bytes::from_static(b"1"), TTL).await.unwrap();
        store.set("k", Bytes::from_static(b"2"), TTL).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(&b"2"[..]));
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let store = store();
        store
            .set("short", Bytes::from_static(b"1"), Duration::from_millis(50))
            .await
            .unwrap();
        store.set("long", Bytes::from_static(b"2"), TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(store.get("short").await.unwrap().is_none());
        assert!(store.get("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_keys_glob_match() {
        let store = store();
        for key in [
            "cache:GET:/api/products",
            "cache:GET:/api/products?page=2",
            "cache:GET:/api/products/abc",
            "cache:GET:/api/orders/ORD-1",
        ] {
            store.set(key, Bytes::from_static(b"{}"), TTL).await.unwrap();
        }

        let mut keys = store.keys("cache:GET:/api/products*").await.unwrap();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "cache:GET:/api/products",
                "cache:GET:/api/products/abc",
                "cache:GET:/api/products?page=2",
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_an_error() {
        let result = store().keys("cache:[").await;
        assert!(matches!(result, Err(CacheError::Command { .. })));
    }

    #[tokio::test]
    async fn test_delete_counts_existing_keys() {
        let store = store();
        store.set("a", Bytes::from_static(b"1"), TTL).await.unwrap();

        let removed = store
            .delete(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capacity_is_measured_in_bytes() {
        let store = MemoryStore::new(4 * 1024, CacheMetrics::new());
        let body = Bytes::from(vec![b'x'; 1024]);

        for i in 0..16 {
            store
                .set(&format!("cache:GET:/api/products?page={i}"), body.clone(), TTL)
                .await
                .unwrap();
        }
        store.sync().await;

        assert!(store.weighted_size() <= 4 * 1024);
        assert!(store.entry_count() < 16);
    }

    #[tokio::test]
    async fn test_entry_larger_than_capacity_is_not_kept() {
        let store = MemoryStore::new(512, CacheMetrics::new());
        store
            .set("big", Bytes::from(vec![b'x'; 1024]), TTL)
            .await
            .unwrap();
        store.sync().await;

        assert!(store.get("big").await.unwrap().is_none());
    }
}
