//! Tower layer que sirve respuestas GET desde el cache y guarda las nuevas.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    body::{Body, Bytes, HttpBody},
    http::{HeaderName, HeaderValue, Method, Request, Response, header},
};
use http_body::Frame;
use tower::{Layer, Service};
use tracing::{trace, warn};

use crate::cache::keys::CacheKey;
use crate::cache::response_cache::ResponseCache;

/// Header que indica si la respuesta vino del cache (`HIT`) o no (`MISS`).
/// Ausente cuando el cache esta deshabilitado.
pub static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

const HIT: HeaderValue = HeaderValue::from_static("HIT");
const MISS: HeaderValue = HeaderValue::from_static("MISS");

/// Layer for a single cached route with its TTL.
#[derive(Clone)]
pub struct CacheLayer {
    cache: ResponseCache,
    ttl: Duration,
}

impl CacheLayer {
    pub fn new(cache: ResponseCache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<S> Layer<S> for CacheLayer {
    type Service = CacheService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CacheService {
            inner,
            cache: self.cache.clone(),
            ttl: self.ttl,
        }
    }
}

#[derive(Clone)]
pub struct CacheService<S> {
    inner: S,
    cache: ResponseCache,
    ttl: Duration,
}

impl<S> Service<Request<Body>> for CacheService<S>
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
        // El clone puede no estar listo; usamos el que ya paso poll_ready
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let cache = self.cache.clone();
        let ttl = self.ttl;

        Box::pin(async move {
            if request.method() != Method::GET || !cache.is_enabled() {
                return inner.call(request).await;
            }

            let key = CacheKey::from_request(&request);
            if let Some(body) = cache.lookup(&key).await {
                trace!(key = %key, "Cache hit");
                return Ok(hit_response(body));
            }

            // La key viaja en este future hasta la fase de escritura
            trace!(key = %key, "Cache miss");
            let response = inner.call(request).await?;
            Ok(store_response(&cache, key, ttl, response).await)
        })
    }
}

fn hit_response(body: Bytes) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(X_CACHE.clone(), HIT);
    response
}

/// Marca la respuesta como MISS y, si es cacheable, la guarda en background.
async fn store_response(
    cache: &ResponseCache,
    key: CacheKey,
    ttl: Duration,
    response: Response<Body>,
) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    parts.headers.insert(X_CACHE.clone(), MISS);

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    let fits = HttpBody::size_hint(&body)
        .upper()
        .is_some_and(|len| len <= cache.max_body_bytes() as u64);

    if !parts.status.is_success() || !is_json || !fits {
        return Response::from_parts(parts, body);
    }

    // Sin limite: el size_hint ya acoto el tamano, y un body que lo
    // excede igual se entrega completo
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            if bytes.len() <= cache.max_body_bytes() {
                cache.store_in_background(key, bytes.clone(), ttl);
            }
            Response::from_parts(parts, Body::from(bytes))
        },
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to buffer response body, not caching");
            Response::from_parts(parts, Body::new(FailedBody(Some(e))))
        },
    }
}

/// Body que reproduce el error del body original, asi el cliente ve lo mismo
/// que veria sin cache.
struct FailedBody(Option<axum::Error>);

impl HttpBody for FailedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().0.take().map(Err))
    }
}
