//! Error types for the Storefront domain.
//!
//! Every fallible catalog or order operation returns `Result<T, StoreError>`.
//! The HTTP layer maps each variant to a status code; nothing in this crate
//! knows about HTTP.
//!
//! # Example
//!
//! ```
//! use storefront_core::{Result, StoreError};
//!
//! fn reserve(stock: u32, wanted: u32) -> Result<u32> {
//!     if wanted > stock {
//!         return Err(StoreError::insufficient_stock("Camiseta", stock, wanted));
//!     }
//!     Ok(stock - wanted)
//! }
//!
//! assert!(reserve(1, 2).unwrap_err().is_conflict());
//! ```

use serde::Serialize;
use thiserror::Error;

/// A single failed input check, reported back to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field, in its wire (camelCase) form.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Main error type for catalog and order operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No product with the given id.
    #[error("Product '{id}' not found")]
    ProductNotFound {
        /// Requested product id
        id: String,
    },

    /// No order with the given order number.
    #[error("Order '{order_number}' not found")]
    OrderNotFound {
        /// Requested order number
        order_number: String,
    },

    /// The product cannot cover the requested quantity.
    #[error("Insufficient stock for {product}. Available: {available}, requested: {requested}")]
    InsufficientStock {
        /// Product name
        product: String,
        /// Units currently in stock
        available: u32,
        /// Units requested by the order
        requested: u32,
    },

    /// Input failed validation.
    #[error("Invalid input data ({} field errors)", .0.len())]
    Validation(Vec<FieldError>),
}

impl StoreError {
    /// Creates a ProductNotFound error.
    pub fn product_not_found(id: impl ToString) -> Self {
        Self::ProductNotFound { id: id.to_string() }
    }

    /// Creates an OrderNotFound error.
    pub fn order_not_found(order_number: impl Into<String>) -> Self {
        Self::OrderNotFound {
            order_number: order_number.into(),
        }
    }

    /// Creates an InsufficientStock error.
    pub fn insufficient_stock(product: impl Into<String>, available: u32, requested: u32) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            available,
            requested,
        }
    }

    /// Creates a Validation error for a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Returns true if the error refers to a missing product or order.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound { .. } | Self::OrderNotFound { .. }
        )
    }

    /// Returns true if the request is well formed but cannot be satisfied.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::InsufficientStock { .. })
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Field errors carried by a validation error, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Type alias for Results with StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;
