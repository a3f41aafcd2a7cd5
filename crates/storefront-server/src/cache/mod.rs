//! Response cache for the Storefront API.
//!
//! GET responses of the catalog routes are stored as JSON bytes in a
//! pluggable backing store (Moka in-process or Redis), keyed by method, path
//! and normalized query. Write handlers invalidate by glob pattern after a
//! successful mutation.

pub mod invalidation;
pub mod keys;
pub mod layer;
pub mod memory;
pub mod redis_store;
pub mod response_cache;
pub mod store;

// Re-exports
pub use invalidation::{InvalidationResult, product_listings_pattern, product_pattern};
pub use keys::CacheKey;
pub use layer::{CacheLayer, X_CACHE};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use response_cache::{ResponseCache, RouteTtls};
pub use store::{CacheError, CacheStore};
