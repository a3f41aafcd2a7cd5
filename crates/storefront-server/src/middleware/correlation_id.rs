//! Middleware que genera o propaga X-Correlation-Id.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header name for the correlation id.
pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Ids entrantes mas largos se reemplazan por uno nuevo.
const MAX_INCOMING_LEN: usize = 128;

/// Correlation id of the current request, available as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Layer that adds a correlation id to requests and responses.
#[derive(Clone, Default)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware that ensures every request carries a correlation id.
#[derive(Clone)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

fn incoming_id<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .get(&CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_INCOMING_LEN)
        .map(String::from)
}

impl<S> Service<Request<Body>> for CorrelationIdMiddleware<S>
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

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let correlation_id = incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

        // Header normalizado para los handlers y el logging
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            request
                .headers_mut()
                .insert(CORRELATION_ID_HEADER.clone(), value);
        }
        request
            .extensions_mut()
            .insert(CorrelationId(correlation_id.clone()));

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                response
                    .headers_mut()
                    .insert(CORRELATION_ID_HEADER.clone(), value);
            }

            Ok(response)
        })
    }
}

// Los tests del layer estan en tests/middleware_test.rs
