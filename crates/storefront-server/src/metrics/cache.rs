//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("storefront_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!(
        "storefront_cache_misses_total",
        "Total number of cache misses"
    );
    metrics::describe_counter!(
        "storefront_cache_stores_total",
        "Responses written to the cache"
    );
    metrics::describe_counter!(
        "storefront_cache_store_failures_total",
        "Cache writes that failed and were skipped"
    );
    metrics::describe_counter!(
        "storefront_cache_invalidated_total",
        "Entries removed by explicit invalidation"
    );
    metrics::describe_counter!(
        "storefront_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!(
        "storefront_cache_entries",
        "Current number of entries in the in-memory cache"
    );
    metrics::describe_histogram!(
        "storefront_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para exponer hit rate y contadores en tests.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    stores: Arc<AtomicU64>,
    store_failures: Arc<AtomicU64>,
    invalidated: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("storefront_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("storefront_cache_misses_total").increment(1);
    }

    pub fn record_store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
        counter!("storefront_cache_stores_total").increment(1);
    }

    pub fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
        counter!("storefront_cache_store_failures_total").increment(1);
    }

    pub fn record_invalidated(&self, count: u64) {
        self.invalidated.fetch_add(count, Ordering::Relaxed);
        counter!("storefront_cache_invalidated_total").increment(count);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &str) {
        counter!("storefront_cache_evictions_total", "reason" => reason.to_string()).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("storefront_cache_entries").set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("storefront_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stores(&self) -> u64 {
        self.stores.load(Ordering::Relaxed)
    }

    pub fn store_failures(&self) -> u64 {
        self.store_failures.load(Ordering::Relaxed)
    }

    pub fn invalidated(&self) -> u64 {
        self.invalidated.load(Ordering::Relaxed)
    }
}
