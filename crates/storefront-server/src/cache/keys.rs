//! Cache key generation and normalization.

use std::fmt;

use axum::http::{Method, Request};

/// Prefijo comun de todas las keys de respuesta.
pub const KEY_PREFIX: &str = "cache";

/// Key unica de una respuesta cacheada: `cache:{METHOD}:{path}[?{query}]`.
///
/// El path pierde la barra final y los pares del query se ordenan, de modo que
/// `?b=2&a=1` y `?a=1&b=2` comparten entrada.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Crea una key a partir de metodo, path y query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use axum::http::Method;
    /// use storefront_server::cache::CacheKey;
    ///
    /// let key = CacheKey::new(&Method::GET, "/api/products/", Some("page=1&category=Ropa"));
    /// assert_eq!(key.as_str(), "cache:GET:/api/products?category=Ropa&page=1");
    /// ```
    pub fn new(method: &Method, path: &str, query: Option<&str>) -> Self {
        let path = normalize_path(path);
        let key = match query.and_then(normalize_query) {
            Some(query) => format!("{KEY_PREFIX}:{method}:{path}?{query}"),
            None => format!("{KEY_PREFIX}:{method}:{path}"),
        };
        Self(key)
    }

    /// Deriva la key de una request entrante.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let uri = request.uri();
        Self::new(request.method(), uri.path(), uri.query())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn normalize_query(query: &str) -> Option<String> {
    let mut pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    if pairs.is_empty() {
        return None;
    }
    pairs.sort_unstable();
    Some(pairs.join("&"))
}
