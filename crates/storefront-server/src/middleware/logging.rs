//! Middleware de logging estructurado.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, Response},
};
use tower::{Layer, Service};
use tracing::{Instrument, info, info_span, warn};

use super::correlation_id::CORRELATION_ID_HEADER;
use crate::cache::X_CACHE;

/// Layer that logs requests and responses.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

/// Middleware that logs request/response details.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();

        // Set by CorrelationIdMiddleware, which runs first
        let correlation_id = request
            .headers()
            .get(&CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let span = info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                info!("Request started");

                let response = inner.call(request).await?;

                let status = response.status();
                let cache = response
                    .headers()
                    .get(&X_CACHE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                let duration_ms = start.elapsed().as_millis() as u64;

                if status.is_server_error() {
                    warn!(status = status.as_u16(), cache, duration_ms, "Request failed");
                } else {
                    info!(status = status.as_u16(), cache, duration_ms, "Request completed");
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
