//! Middleware stack para el servidor HTTP.
//!
//! Este modulo contiene los middleware de Tower que se aplican a todas las requests:
//! - `CorrelationIdLayer`: Genera/propaga X-Correlation-Id
//! - `LoggingLayer`: Logging estructurado de requests
//! - `rate_limit`: Limite por cliente (general y de ordenes), via `from_fn_with_state`
//!
//! Los headers de seguridad, la compresion y el limite de body se arman en
//! [`crate::server`] con layers de `tower-http` y axum.
//!
//! El cache de respuestas es un layer por ruta, ver [`crate::cache::CacheLayer`].

mod correlation_id;
mod logging;
mod rate_limit;

pub use correlation_id::{
    CORRELATION_ID_HEADER, CorrelationId, CorrelationIdLayer, CorrelationIdMiddleware,
};
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use rate_limit::{
    Decision, RATELIMIT_LIMIT, RATELIMIT_REMAINING, RateLimiter, RequestLimits, rate_limit,
};
