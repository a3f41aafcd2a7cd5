//! Storefront Server - HTTP API for the Storefront catalog
//!
//! Axum server exposing products and orders. Catalog reads are served
//! through a response cache backed by Moka or Redis, selected with
//! `cache.url`; writes invalidate the affected entries.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod repository;
pub mod server;
pub mod state;

pub use crate::config::Settings;
pub use error::AppError;
pub use server::{create_router, create_router_with_metrics, run_server};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
