//! Cache invalidation with pattern matching support.

use std::time::Instant;

use glob::Pattern;
use tracing::{debug, info, warn};

use crate::cache::keys::KEY_PREFIX;
use crate::cache::response_cache::ResponseCache;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Número de entries invalidadas.
    pub count: u64,
    /// Patrones aplicados.
    pub patterns: Vec<String>,
}

impl InvalidationResult {
    fn merge(mut self, other: InvalidationResult) -> Self {
        self.count += other.count;
        self.patterns.extend(other.patterns);
        self
    }
}

/// Patron que cubre listados, categorias y detalle de productos.
pub fn product_listings_pattern() -> String {
    format!("{KEY_PREFIX}:GET:/api/products*")
}

/// Patron de las entradas de un producto. El id se escapa, asi un id con
/// `*` o `[` no puede ampliar el match.
pub fn product_pattern(id: &str) -> String {
    format!("{KEY_PREFIX}:GET:/api/products/{}*", Pattern::escape(id))
}

impl ResponseCache {
    /// Invalida entradas usando un patrón glob sobre la key completa.
    ///
    /// Errores del store se registran y cuentan como cero entradas.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use storefront_server::cache::ResponseCache;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let cache = ResponseCache::disabled();
    /// let result = cache.invalidate("cache:GET:/api/orders*").await;
    /// println!("Invalidated {} entries", result.count);
    /// # }
    /// ```
    pub async fn invalidate(&self, pattern: &str) -> InvalidationResult {
        let mut result = InvalidationResult {
            count: 0,
            patterns: vec![pattern.to_string()],
        };

        let Some(store) = self.store() else {
            return result;
        };

        let start = Instant::now();
        let keys = match store.keys(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Failed to list cache keys");
                return result;
            },
        };

        if keys.is_empty() {
            debug!(pattern = %pattern, "No cache entries to invalidate");
            return result;
        }

        match store.delete(&keys).await {
            Ok(count) => result.count = count,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Failed to delete cache entries");
                return result;
            },
        }

        self.metrics().record_invalidated(result.count);
        self.metrics()
            .record_operation_duration("invalidate", start.elapsed());

        info!(
            pattern = %pattern,
            count = result.count,
            "Cache entries invalidated by pattern"
        );

        result
    }

    /// Invalida todos los listados de productos.
    pub async fn invalidate_product_listings(&self) -> InvalidationResult {
        self.invalidate(&product_listings_pattern()).await
    }

    /// Invalida el detalle de un producto y luego los listados.
    pub async fn invalidate_product(&self, id: &str) -> InvalidationResult {
        let detail = self.invalidate(&product_pattern(id)).await;
        detail.merge(self.invalidate_product_listings().await)
    }

    /// Invalida el detalle de cada producto y los listados una sola vez.
    ///
    /// Con N productos son N + 1 patrones, no 2N como llamando a
    /// [`invalidate_product`](Self::invalidate_product) por cada uno.
    pub async fn invalidate_products<I, S>(&self, ids: I) -> InvalidationResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = InvalidationResult::default();
        for id in ids {
            result = result.merge(self.invalidate(&product_pattern(id.as_ref())).await);
        }
        result.merge(self.invalidate_product_listings().await)
    }
}
