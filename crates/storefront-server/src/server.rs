use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::{MethodRouter, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::{info, warn};

use crate::cache::X_CACHE;
use crate::handlers::{
    health::health_check,
    metrics::metrics_handler,
    not_found,
    orders::{create_order, get_order, list_orders_by_email},
    products::{
        create_product, delete_product, get_product, list_categories, list_products,
        update_product,
    },
};
use crate::middleware::{
    CORRELATION_ID_HEADER, CorrelationIdLayer, LoggingLayer, RATELIMIT_LIMIT,
    RATELIMIT_REMAINING, RateLimiter, rate_limit,
};
use crate::state::AppState;

/// Headers de seguridad agregados a toda respuesta que no los traiga.
fn security_headers() -> [(HeaderName, HeaderValue); 8] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        (
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
                 font-src 'self' https://fonts.gstatic.com; img-src 'self' data: https:; \
                 script-src 'self'; connect-src 'self'",
            ),
        ),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ),
        (
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ),
        (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
    ]
}

fn with_security_headers(router: Router) -> Router {
    security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
}

/// Aplica `limiter` a la ruta, si hay uno configurado.
fn limited(route: MethodRouter<AppState>, limiter: Option<&RateLimiter>) -> MethodRouter<AppState> {
    match limiter {
        Some(limiter) => route.route_layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit,
        )),
        None => route,
    }
}

/// Creates the API router.
///
/// Los GET del catalogo pasan por el cache de respuestas con el TTL de su
/// ruta; los demas metodos de esas rutas lo atraviesan sin efecto. Todas las
/// rutas `/api/*` salvo health tienen rate limit por cliente, y las de
/// ordenes uno adicional mas estricto.
pub fn create_router(state: AppState) -> Router {
    let cache = state.cache().clone();
    let ttls = *cache.ttls();
    let limits = state.limits().clone();

    let middleware_stack = ServiceBuilder::new()
        .layer(CorrelationIdLayer)
        .layer(LoggingLayer);

    let mut api = Router::new()
        // Catalogo
        .route(
            "/api/products",
            get(list_products)
                .post(create_product)
                .route_layer(cache.layer(ttls.product_list)),
        )
        .route(
            "/api/products/categories/list",
            get(list_categories).route_layer(cache.layer(ttls.category_list)),
        )
        .route(
            "/api/products/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .route_layer(cache.layer(ttls.product_detail)),
        )
        // Ordenes, sin cache
        .route(
            "/api/orders",
            limited(
                get(list_orders_by_email).post(create_order),
                limits.orders.as_ref(),
            ),
        )
        .route(
            "/api/orders/{order_number}",
            limited(get(get_order), limits.orders.as_ref()),
        );

    if let Some(limiter) = &limits.api {
        api = api.route_layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit,
        ));
    }

    let router = Router::new()
        .route("/api/health", get(health_check))
        .merge(api)
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ));

    with_security_headers(router)
        .layer(CompressionLayer::new())
        .layer(middleware_stack)
}

/// Creates the full application: API, `/metrics` and CORS.
pub fn create_router_with_metrics(
    state: AppState,
    prometheus_handle: PrometheusHandle,
    cors_origins: &[String],
) -> Router {
    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_router(state))
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, CORRELATION_ID_HEADER.clone()])
        .expose_headers([
            X_CACHE.clone(),
            CORRELATION_ID_HEADER.clone(),
            RATELIMIT_LIMIT.clone(),
            RATELIMIT_REMAINING.clone(),
            header::RETRY_AFTER,
        ])
}

/// Runs the server until Ctrl+C or SIGTERM.
///
/// La IP del peer queda disponible como `ConnectInfo` para el rate limiting.
pub async fn run_server(addr: SocketAddr, app: Router) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
