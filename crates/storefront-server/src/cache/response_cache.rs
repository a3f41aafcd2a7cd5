//! Response cache handle shared by the middleware and the write handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use serde::de::IgnoredAny;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::keys::CacheKey;
use crate::cache::layer::CacheLayer;
use crate::cache::memory::MemoryStore;
use crate::cache::redis_store::RedisStore;
use crate::cache::store::{CacheError, CacheStore};
use crate::config::CacheSettings;
use crate::metrics::CacheMetrics;

/// TTL por ruta cacheada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTtls {
    pub default: Duration,
    pub product_list: Duration,
    pub product_detail: Duration,
    pub category_list: Duration,
}

impl Default for RouteTtls {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(300),
            product_list: Duration::from_secs(120),
            product_detail: Duration::from_secs(300),
            category_list: Duration::from_secs(600),
        }
    }
}

/// Cache de respuestas HTTP, best-effort.
///
/// Sin store configurado (o si no conecto al arrancar) todas las operaciones
/// son no-ops y la aplicacion responde igual, solo sin cache. Los errores del
/// store se registran y nunca se propagan.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use storefront_server::cache::{CacheKey, MemoryStore, ResponseCache, RouteTtls};
/// use storefront_server::metrics::CacheMetrics;
/// use axum::http::Method;
///
/// # #[tokio::main]
/// # async fn main() {
/// let metrics = CacheMetrics::new();
/// let store = Arc::new(MemoryStore::new(64 * 1024 * 1024, metrics.clone()));
/// let cache = ResponseCache::new(store, RouteTtls::default(), metrics);
///
/// let key = CacheKey::new(&Method::GET, "/api/products", Some("page=1"));
/// if cache.lookup(&key).await.is_none() {
///     println!("Cache miss");
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct ResponseCache {
    store: Option<Arc<dyn CacheStore>>,
    ttls: RouteTtls,
    max_body_bytes: usize,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

    /// Cache backed by `store`.
    pub fn new(store: Arc<dyn CacheStore>, ttls: RouteTtls, metrics: CacheMetrics) -> Self {
        Self {
            store: Some(store),
            ttls,
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
            metrics,
        }
    }

    /// Cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttls: RouteTtls::default(),
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
            metrics: CacheMetrics::new(),
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Abre el store indicado por `settings.url`.
    ///
    /// Nunca falla: sin url, con un esquema desconocido o si el backend no
    /// responde, retorna un cache deshabilitado.
    pub async fn connect(settings: &CacheSettings) -> Self {
        let ttls = RouteTtls::from(&settings.ttl);
        let metrics = CacheMetrics::new();

        let Some(url) = settings.url() else {
            info!("No cache url configured, response caching disabled");
            return Self {
                ttls,
                max_body_bytes: settings.max_body_bytes,
                ..Self::disabled()
            };
        };

        match open_store(url, settings, &metrics).await {
            Ok(store) => {
                info!(backend = store.backend(), "Response cache enabled");
                Self::new(store, ttls, metrics).with_max_body_bytes(settings.max_body_bytes)
            },
            Err(e) => {
                warn!(error = %e, "Cache backend unavailable, response caching disabled");
                Self {
                    ttls,
                    max_body_bytes: settings.max_body_bytes,
                    ..Self::disabled()
                }
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Backend name, `None` when disabled.
    pub fn backend(&self) -> Option<&'static str> {
        self.store.as_ref().map(|s| s.backend())
    }

    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }

    pub fn ttls(&self) -> &RouteTtls {
        &self.ttls
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Busca una respuesta cacheada.
    ///
    /// Errores del store y payloads que no son JSON valido cuentan como miss.
    pub async fn lookup(&self, key: &CacheKey) -> Option<Bytes> {
        let store = self.store.as_ref()?;

        let start = Instant::now();
        let result = store.get(key.as_str()).await;
        self.metrics
            .record_operation_duration("get", start.elapsed());

        match result {
            Ok(Some(body)) if serde_json::from_slice::<IgnoredAny>(&body).is_ok() => {
                self.metrics.record_hit();
                Some(body)
            },
            Ok(Some(_)) => {
                warn!(key = %key, "Discarding cache entry that is not valid JSON");
                self.metrics.record_miss();
                None
            },
            Ok(None) => {
                self.metrics.record_miss();
                None
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                self.metrics.record_miss();
                None
            },
        }
    }

    /// Guarda `body` bajo `key` en una task aparte (fire-and-forget).
    ///
    /// Returns the task handle, or `None` when the cache is disabled. Callers
    /// are not expected to await it.
    pub fn store_in_background(
        &self,
        key: CacheKey,
        body: Bytes,
        ttl: Duration,
    ) -> Option<JoinHandle<()>> {
        let store = Arc::clone(self.store.as_ref()?);
        let metrics = self.metrics.clone();

        Some(tokio::spawn(async move {
            let start = Instant::now();
            match store.set(key.as_str(), body, ttl).await {
                Ok(()) => {
                    metrics.record_store();
                    debug!(key = %key, ttl_secs = ttl.as_secs(), "Response cached");
                },
                Err(e) => {
                    metrics.record_store_failure();
                    warn!(key = %key, error = %e, "Failed to store response in cache");
                },
            }
            metrics.record_operation_duration("set", start.elapsed());
        }))
    }

    /// Layer que cachea la ruta a la que se aplica con `ttl`; un TTL cero
    /// toma `ttls.default`.
    pub fn layer(&self, ttl: Duration) -> CacheLayer {
        let ttl = if ttl.is_zero() { self.ttls.default } else { ttl };
        CacheLayer::new(self.clone(), ttl)
    }

    /// True when a store is configured and answers a ping.
    pub async fn is_reachable(&self) -> bool {
        match &self.store {
            Some(store) => match store.ping().await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Cache backend not reachable");
                    false
                },
            },
            None => false,
        }
    }
}

async fn open_store(
    url: &str,
    settings: &CacheSettings,
    metrics: &CacheMetrics,
) -> Result<Arc<dyn CacheStore>, CacheError> {
    let scheme = url.split_once("://").map_or(url, |(scheme, _)| scheme);

    match scheme {
        "memory" => Ok(Arc::new(MemoryStore::new(
            settings.memory_max_bytes,
            metrics.clone(),
        ))),
        "redis" => {
            let store = RedisStore::connect(
                url,
                settings.connect_timeout(),
                settings.command_timeout(),
            )
            .await?;
            store.ping().await?;
            Ok(Arc::new(store))
        },
        other => Err(CacheError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
