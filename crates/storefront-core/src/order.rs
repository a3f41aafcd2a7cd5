//! Customer orders.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::product::Product;
use crate::validate::Validator;

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Confirmado")]
    Confirmed,
    #[serde(rename = "Enviado")]
    Shipped,
    #[serde(rename = "Entregado")]
    Delivered,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Confirmed => "Confirmado",
            OrderStatus::Shipped => "Enviado",
            OrderStatus::Delivered => "Entregado",
            OrderStatus::Cancelled => "Cancelado",
        };
        f.write_str(name)
    }
}

/// Snapshot of a product as it was when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub image: String,
}

impl OrderItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Formats an order number as `ORD-{unix millis}-{sequence}`.
    ///
    /// ```
    /// assert_eq!(storefront_core::Order::number(1700000000000, 7), "ORD-1700000000000-7");
    /// ```
    pub fn number(unix_millis: i64, sequence: u64) -> String {
        format!("ORD-{unix_millis}-{sequence}")
    }

    /// Sum of item subtotals, independent of the total sent by the client.
    pub fn calculated_total(&self) -> f64 {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    pub fn formatted_total(&self) -> String {
        format!("${:.2}", self.total)
    }
}

/// One requested line of a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub product: String,
    pub quantity: i64,
}

/// Payload for `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<NewOrderItem>,
    pub total: f64,
}

/// A [`NewOrder`] that passed validation.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<(Uuid, u32)>,
    pub total: f64,
}

impl NewOrder {
    /// Validates the payload, normalising text and parsing product ids.
    pub fn validate(self) -> Result<OrderRequest> {
        let mut v = Validator::new();
        v.text("customerName", &self.customer_name, 1, 100)
            .email("customerEmail", &self.customer_email)
            .text("customerAddress", &self.customer_address, 1, 200)
            .check(
                !self.items.is_empty(),
                "items",
                "at least one product is required",
            )
            .number_at_least("total", self.total, 0.0);

        let mut items = Vec::with_capacity(self.items.len());
        for (i, item) in self.items.iter().enumerate() {
            let id = Uuid::parse_str(item.product.trim());
            v.check(
                id.is_ok(),
                &format!("items[{i}].product"),
                "Invalid product id",
            );
            let quantity_ok = (1..=u32::MAX as i64).contains(&item.quantity);
            v.check(
                quantity_ok,
                &format!("items[{i}].quantity"),
                "quantity must be at least 1",
            );
            if let (Ok(id), true) = (id, quantity_ok) {
                items.push((id, item.quantity as u32));
            }
        }
        v.finish()?;

        Ok(OrderRequest {
            customer_name: self.customer_name.trim().to_string(),
            customer_email: self.customer_email.trim().to_lowercase(),
            customer_address: self.customer_address.trim().to_string(),
            items,
            total: self.total,
        })
    }
}
