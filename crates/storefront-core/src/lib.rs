//! Storefront Core - Domain types for the catalog and orders
//!
//! Products, orders, listing queries and input validation. This crate has no
//! I/O; persistence and HTTP live in `storefront-server`.

pub mod error;
pub mod order;
pub mod product;
pub mod query;
pub mod validate;

pub use error::{FieldError, Result, StoreError};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderRequest, OrderStatus};
pub use product::{Category, NewProduct, Product, ProductPatch};
pub use query::{Page, Pagination, ProductQuery, SortField, SortOrder};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
