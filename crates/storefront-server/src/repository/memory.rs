//! In-memory repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use storefront_core::{
    Category, NewProduct, Order, OrderItem, OrderRequest, OrderStatus, Page, Product, ProductPatch,
    ProductQuery, Result, StoreError,
};
use tracing::debug;
use uuid::Uuid;

use super::{OrderRepository, ProductRepository, seed};

#[derive(Debug, Default)]
struct Inner {
    // Orden de insercion, asi los empates del sort son deterministas
    products: IndexMap<Uuid, Product>,
    orders: Vec<Order>,
    order_sequence: u64,
}

/// Products and orders held in process memory behind one lock.
///
/// Order placement takes the write lock once for the whole check-and-decrement,
/// so concurrent orders never oversell.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the sample catalog.
    pub fn seeded() -> Result<Self> {
        let store = Self::new();
        let now = Utc::now();
        for (i, input) in seed::sample_products().into_iter().enumerate() {
            // Timestamps crecientes para que el orden por defecto sea estable
            let created_at = now + chrono::Duration::milliseconds(i as i64);
            store.insert(Product::create(input, created_at)?);
        }
        Ok(store)
    }

    /// Inserts a product as-is, replacing any product with the same id.
    pub fn insert(&self, product: Product) {
        self.inner.write().products.insert(product.id, product);
    }

    pub fn product_count(&self) -> usize {
        self.inner.read().products.len()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self, query: &ProductQuery) -> Result<Page<Product>> {
        let inner = self.inner.read();
        Ok(query.apply(inner.products.values()))
    }

    async fn get(&self, id: Uuid) -> Result<Product> {
        self.inner
            .read()
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::product_not_found(id))
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let inner = self.inner.read();
        let mut categories: Vec<Category> = inner.products.values().map(|p| p.category).collect();
        categories.sort_by_key(|c| c.as_str());
        categories.dedup();
        Ok(categories)
    }

    async fn create(&self, input: NewProduct) -> Result<Product> {
        let product = Product::create(input, Self::now())?;
        self.insert(product.clone());
        debug!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product> {
        let mut inner = self.inner.write();
        let product = inner
            .products
            .get_mut(&id)
            .ok_or_else(|| StoreError::product_not_found(id))?;
        product.apply(patch, Self::now())?;
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Product> {
        // shift_remove conserva el orden del resto
        self.inner
            .write()
            .products
            .shift_remove(&id)
            .ok_or_else(|| StoreError::product_not_found(id))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn place(&self, request: OrderRequest) -> Result<Order> {
        let mut inner = self.inner.write();

        // Lineas repetidas del mismo producto se suman antes de chequear stock
        let mut requested: IndexMap<Uuid, u32> = IndexMap::new();
        for &(id, quantity) in &request.items {
            let total = requested.entry(id).or_insert(0);
            *total = total.saturating_add(quantity);
        }

        for (id, &quantity) in &requested {
            let product = inner
                .products
                .get(id)
                .ok_or_else(|| StoreError::product_not_found(id))?;
            if product.stock < quantity {
                return Err(StoreError::insufficient_stock(
                    product.name.clone(),
                    product.stock,
                    quantity,
                ));
            }
        }

        let now = Self::now();
        let mut items = Vec::with_capacity(request.items.len());
        for &(id, quantity) in &request.items {
            if let Some(product) = inner.products.get(&id) {
                items.push(OrderItem::from_product(product, quantity));
            }
        }
        for (id, quantity) in requested {
            if let Some(product) = inner.products.get_mut(&id) {
                product.stock -= quantity;
                product.updated_at = now;
            }
        }

        inner.order_sequence += 1;
        let order = Order {
            order_number: Order::number(now.timestamp_millis(), inner.order_sequence),
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_address: request.customer_address,
            items,
            total: request.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.orders.push(order.clone());

        debug!(order_number = %order.order_number, items = order.items.len(), "Order placed");
        Ok(order)
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Order> {
        self.inner
            .read()
            .orders
            .iter()
            .find(|o| o.order_number == order_number)
            .cloned()
            .ok_or_else(|| StoreError::order_not_found(order_number))
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Order>> {
        let email = email.trim().to_lowercase();
        let inner = self.inner.read();
        // Las ordenes se guardan en orden de creacion
        Ok(inner
            .orders
            .iter()
            .rev()
            .filter(|o| o.customer_email == email)
            .cloned()
            .collect())
    }
}
