//! Storefront server binary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use storefront_server::{
    AppState, Settings, cache::ResponseCache, create_router_with_metrics, metrics::init_metrics,
    middleware::RequestLimits, repository::InMemoryStore, run_server,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var_os("STOREFRONT_CONFIG").map(PathBuf::from);
    let settings =
        Settings::load(config_file.as_deref()).context("failed to load configuration")?;
    let addr = settings
        .server
        .socket_addr()
        .context("invalid server address")?;

    tracing::info!(
        "Starting Storefront server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let prometheus = init_metrics().context("failed to initialize metrics")?;

    // Sin backend disponible el cache queda deshabilitado, no es un error
    let cache = ResponseCache::connect(&settings.cache).await;

    let store = if settings.catalog.seed {
        let store = InMemoryStore::seeded().context("invalid sample catalog")?;
        tracing::info!(products = store.product_count(), "Sample catalog loaded");
        store
    } else {
        InMemoryStore::new()
    };

    let limits = RequestLimits::from(&settings.limits);
    let _sweeper = limits.spawn_sweeper(Duration::from_secs(60));
    let state = AppState::in_memory(store, cache.clone()).with_limits(limits);
    let app = create_router_with_metrics(state, prometheus, &settings.server.cors_origins);

    run_server(addr, app).await?;

    tracing::info!(
        hits = cache.metrics().hits(),
        misses = cache.metrics().misses(),
        hit_rate = cache.metrics().hit_rate(),
        "Server stopped"
    );
    Ok(())
}
