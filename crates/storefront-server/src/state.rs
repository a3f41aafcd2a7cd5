//! Application state.

use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResponseCache;
use crate::middleware::RequestLimits;
use crate::repository::{InMemoryStore, OrderRepository, ProductRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    cache: ResponseCache,
    limits: RequestLimits,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        cache: ResponseCache,
    ) -> Self {
        Self {
            products,
            orders,
            cache,
            limits: RequestLimits::default(),
            started_at: Instant::now(),
        }
    }

    /// Reemplaza los limites por defecto (rate limiting, tamano de body).
    pub fn with_limits(mut self, limits: RequestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Creates an AppState where one in-memory store serves both repositories.
    pub fn in_memory(store: InMemoryStore, cache: ResponseCache) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, cache)
    }

    pub fn products(&self) -> &dyn ProductRepository {
        self.products.as_ref()
    }

    pub fn orders(&self) -> &dyn OrderRepository {
        self.orders.as_ref()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn limits(&self) -> &RequestLimits {
        &self.limits
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
