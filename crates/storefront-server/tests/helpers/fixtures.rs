//! Apps y stores preparados para los tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use serde_json::{Value, json};
use storefront_core::ProductQuery;
use storefront_server::{
    AppState,
    cache::{CacheError, CacheStore, MemoryStore, ResponseCache, RouteTtls},
    create_router,
    metrics::CacheMetrics,
    middleware::{RateLimiter, RequestLimits},
    repository::{InMemoryStore, ProductRepository},
};

use super::client::TestClient;

/// App de test: el cliente mas acceso directo al estado.
pub struct TestApp {
    pub client: TestClient,
    pub state: AppState,
}

impl TestApp {
    pub fn cache(&self) -> &ResponseCache {
        self.state.cache()
    }

    /// Id de un producto del catalogo de ejemplo.
    pub async fn any_product_id(&self) -> String {
        let page = self
            .state
            .products()
            .list(&ProductQuery::default())
            .await
            .unwrap();
        page.data[0].id.to_string()
    }
}

pub fn memory_cache(ttls: RouteTtls) -> ResponseCache {
    let metrics = CacheMetrics::new();
    let store = Arc::new(MemoryStore::new(16 * 1024 * 1024, metrics.clone()));
    ResponseCache::new(store, ttls, metrics)
}

fn build_app(cache: ResponseCache, limits: RequestLimits) -> TestApp {
    let store = InMemoryStore::seeded().expect("sample catalog is valid");
    let state = AppState::in_memory(store, cache).with_limits(limits);
    TestApp {
        client: TestClient::new(create_router(state.clone())),
        state,
    }
}

/// App con catalogo de ejemplo y el cache dado, limites por defecto.
pub fn app_with_cache(cache: ResponseCache) -> TestApp {
    build_app(cache, RequestLimits::default())
}

/// App con cache en memoria y los limites dados.
pub fn app_with_limits(limits: RequestLimits) -> TestApp {
    build_app(memory_cache(RouteTtls::default()), limits)
}

/// Limites con ventanas de una hora y los maximos dados.
pub fn tight_limits(api_max: u32, orders_max: u32) -> RequestLimits {
    let hour = Duration::from_secs(3600);
    RequestLimits {
        api: Some(RateLimiter::with_default_message("api", hour, api_max)),
        orders: Some(RateLimiter::with_default_message("orders", hour, orders_max)),
        ..RequestLimits::default()
    }
}

/// App con cache en memoria y TTLs por defecto.
pub fn app() -> TestApp {
    app_with_cache(memory_cache(RouteTtls::default()))
}

pub fn app_without_cache() -> TestApp {
    app_with_cache(ResponseCache::disabled())
}

/// Espera a que el store en background termine `n` escrituras (ok o fallidas).
pub async fn wait_for_stores(cache: &ResponseCache, n: u64) {
    for _ in 0..200 {
        let metrics = cache.metrics();
        if metrics.stores() + metrics.store_failures() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("cache stores did not complete in time");
}

/// Store que falla en cada operacion.
#[derive(Default)]
pub struct FailingStore {
    pub attempts: AtomicU64,
}

impl FailingStore {
    fn fail(&self, command: &'static str) -> CacheError {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        CacheError::Connection(format!("{command}: connection refused"))
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        Err(self.fail("GET"))
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> Result<(), CacheError> {
        Err(self.fail("SET"))
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, CacheError> {
        Err(self.fail("KEYS"))
    }

    async fn delete(&self, _keys: &[String]) -> Result<u64, CacheError> {
        Err(self.fail("DEL"))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(self.fail("PING"))
    }
}

/// Payload valido para crear un producto.
pub fn new_product(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Producto creado en un test",
        "price": 42.5,
        "image": "https://example.com/product.jpg",
        "stock": 10,
        "category": "Hogar"
    })
}
