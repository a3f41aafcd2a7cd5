//! Per-client sliding-window rate limiting.
//!
//! Un limiter cubre todas las rutas de la API y otro, mas estricto, las de
//! ordenes. El cliente se identifica por la IP del socket (`ConnectInfo`).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::metrics::http::record_rate_limited;

pub static RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub static RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");

/// Key usada cuando la request no trae `ConnectInfo` (tests, embedding).
const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Ventana deslizante por cliente: a lo sumo `max_requests` dentro de
/// cualquier intervalo de `window`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    name: &'static str,
    window: Duration,
    max_requests: u32,
    message: Arc<str>,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(
        name: &'static str,
        window: Duration,
        max_requests: u32,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            name,
            window,
            max_requests,
            message: message.into(),
            buckets: Arc::new(DashMap::new()),
        }
    }

    /// 100 requests cada 15 minutos.
    pub fn api() -> Self {
        Self::with_default_message("api", Duration::from_secs(15 * 60), 100)
    }

    /// 10 requests por hora.
    pub fn orders() -> Self {
        Self::with_default_message("orders", Duration::from_secs(60 * 60), 10)
    }

    pub fn with_default_message(name: &'static str, window: Duration, max_requests: u32) -> Self {
        let minutes = window.as_secs().div_ceil(60).max(1);
        let message = match name {
            "orders" => format!("Too many orders, try again in {minutes} minutes"),
            _ => format!("Too many requests, try again in {minutes} minutes"),
        };
        Self::new(name, window, max_requests, message)
    }

    /// Cuenta una request de `client` si entra en la ventana.
    pub fn check(&self, client: &str) -> Decision {
        let now = Instant::now();
        let window = self.window;

        let mut hits = self.buckets.entry(client.to_string()).or_default();
        hits.retain(|at| now.duration_since(*at) < window);

        if hits.len() >= self.max_requests as usize {
            // El slot se libera cuando el hit mas viejo sale de la ventana
            let retry_after = hits
                .first()
                .map_or(window, |oldest| window.saturating_sub(now.duration_since(*oldest)));
            return Decision::Limited { retry_after };
        }

        hits.push(now);
        Decision::Allowed {
            remaining: self.max_requests.saturating_sub(hits.len() as u32),
        }
    }

    /// Elimina clientes sin hits dentro de la ventana.
    pub fn sweep(&self) {
        let now = Instant::now();
        let window = self.window;
        self.buckets.retain(|_, hits| {
            hits.retain(|at| now.duration_since(*at) < window);
            !hits.is_empty()
        });
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Clientes con estado en memoria.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }
}

/// Limites aplicados a cada request: rate limiters y tamano maximo del body.
#[derive(Debug, Clone)]
pub struct RequestLimits {
    /// Todas las rutas `/api/*` salvo health. `None` desactiva el limite.
    pub api: Option<RateLimiter>,
    /// Rutas `/api/orders*`, ademas del limite general.
    pub orders: Option<RateLimiter>,
    pub max_body_bytes: usize,
}

impl RequestLimits {
    pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

    /// Sin rate limiting, con el limite de body por defecto.
    pub fn unlimited() -> Self {
        Self {
            api: None,
            orders: None,
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
        }
    }

    fn limiters(&self) -> impl Iterator<Item = &RateLimiter> {
        self.api.iter().chain(self.orders.iter())
    }

    /// Lanza una task que purga clientes inactivos cada `every`.
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiters: Vec<RateLimiter> = self.limiters().cloned().collect();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                for limiter in &limiters {
                    limiter.sweep();
                    debug!(
                        limiter = limiter.name(),
                        clients = limiter.tracked_clients(),
                        "Rate limiter swept"
                    );
                }
            }
        })
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            api: Some(RateLimiter::api()),
            orders: Some(RateLimiter::orders()),
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), |ConnectInfo(addr)| addr.ip().to_string())
}

/// Middleware para `from_fn_with_state`: responde 429 cuando el cliente
/// agoto su ventana y agrega los headers `RateLimit-*` en caso contrario.
pub async fn rate_limit(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    let client = client_key(&request);

    match limiter.check(&client) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            // Con limiters anidados, el mas especifico (interno) ya escribio
            let headers = response.headers_mut();
            headers
                .entry(RATELIMIT_LIMIT.clone())
                .or_insert(HeaderValue::from(limiter.limit()));
            headers
                .entry(RATELIMIT_REMAINING.clone())
                .or_insert(HeaderValue::from(remaining));
            response
        },
        Decision::Limited { retry_after } => {
            warn!(
                limiter = limiter.name(),
                client = %client,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            record_rate_limited(limiter.name());
            AppError::TooManyRequests {
                message: limiter.message().to_string(),
                retry_after,
            }
            .into_response()
        },
    }
}
