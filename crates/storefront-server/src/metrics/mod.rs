//! Metrics module for the Storefront server.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::CacheMetrics;
pub use setup::init_metrics;
