//! HTTP metrics middleware.
//!
//! Each request is labelled with its route template and with the cache
//! outcome read from the `X-Cache` response header, so HIT and MISS latency
//! are separate series.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderMap, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};

use crate::cache::X_CACHE;

const REQUESTS_TOTAL: &str = "storefront_http_requests_total";
const REQUEST_DURATION: &str = "storefront_http_request_duration_seconds";
const RATE_LIMITED_TOTAL: &str = "storefront_http_rate_limited_total";

/// Resultado del cache para una respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    /// Ruta sin cache, metodo distinto de GET o cache deshabilitado.
    Bypass,
}

impl CacheOutcome {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(&X_CACHE).map(|v| v.as_bytes()) {
            Some(b"HIT") => CacheOutcome::Hit,
            Some(b"MISS") => CacheOutcome::Miss,
            _ => CacheOutcome::Bypass,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Bypass => "bypass",
        }
    }
}

/// Labels de una request ya respondida.
#[derive(Debug, Clone)]
pub struct RequestLabels {
    pub method: Method,
    /// Template de la ruta (`/api/products/{id}`), o `unmatched`.
    pub route: String,
    pub status: StatusCode,
    pub cache: CacheOutcome,
}

impl RequestLabels {
    pub fn new(method: Method, matched_path: Option<&MatchedPath>, response: &Response) -> Self {
        Self {
            method,
            // Usar el template evita una serie por cada id de producto
            route: matched_path.map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string()),
            status: response.status(),
            cache: CacheOutcome::from_headers(response.headers()),
        }
    }
}

/// Registra contador e histograma para una request.
pub fn record_request(labels: &RequestLabels, duration: Duration) {
    let method = labels.method.to_string();

    counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => labels.route.clone(),
        "status" => labels.status.as_u16().to_string(),
        "cache" => labels.cache.as_str()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION,
        "method" => method,
        "route" => labels.route.clone(),
        "cache" => labels.cache.as_str()
    )
    .record(duration.as_secs_f64());
}

/// Cuenta una request rechazada por un rate limiter.
pub fn record_rate_limited(limiter: &'static str) {
    counter!(RATE_LIMITED_TOTAL, "limiter" => limiter).increment(1);
}

/// Middleware que registra metricas HTTP para cada request.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    let labels = RequestLabels::new(method, matched_path.as_ref(), &response);
    record_request(&labels, start.elapsed());

    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        REQUESTS_TOTAL,
        "Total number of HTTP requests by route, status and cache outcome"
    );
    metrics::describe_histogram!(
        REQUEST_DURATION,
        "HTTP request duration in seconds by route and cache outcome"
    );
    metrics::describe_counter!(
        RATE_LIMITED_TOTAL,
        "Requests rejected with 429 by limiter"
    );
}
