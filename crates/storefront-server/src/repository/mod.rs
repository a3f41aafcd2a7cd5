//! Persistence abstraction for the catalog and orders.
//!
//! Handlers only see these traits; [`InMemoryStore`] is the bundled
//! implementation.

mod memory;
mod seed;

use async_trait::async_trait;
use storefront_core::{
    Category, NewProduct, Order, OrderRequest, Page, Product, ProductPatch, ProductQuery, Result,
};
use uuid::Uuid;

pub use memory::InMemoryStore;
pub use seed::sample_products;

/// Catalog persistence.
///
/// Every method is a single atomic operation; `update` and `delete` report
/// `StoreError::ProductNotFound` for unknown ids.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Filters, sorts and paginates the catalog.
    async fn list(&self, query: &ProductQuery) -> Result<Page<Product>>;

    async fn get(&self, id: Uuid) -> Result<Product>;

    /// Distinct categories currently in use, sorted by name.
    async fn categories(&self) -> Result<Vec<Category>>;

    async fn create(&self, input: NewProduct) -> Result<Product>;

    /// Applies a partial update and returns the updated product.
    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product>;

    /// Removes a product and returns it.
    async fn delete(&self, id: Uuid) -> Result<Product>;
}

/// Order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Checks stock for every item and decrements it, all or nothing.
    ///
    /// # Errors
    ///
    /// - `StoreError::ProductNotFound` if any item references an unknown product
    /// - `StoreError::InsufficientStock` if any product cannot cover its quantity
    async fn place(&self, request: OrderRequest) -> Result<Order>;

    async fn find_by_number(&self, order_number: &str) -> Result<Order>;

    /// Orders of a customer, newest first. The email is compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Order>>;
}
