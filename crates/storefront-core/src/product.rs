//! Catalog products and their inputs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::validate::Validator;

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// Product category.
///
/// The wire names are the catalog's display names.
///
/// # Example
///
/// ```
/// use storefront_core::Category;
///
/// let category: Category = "Hogar".parse().unwrap();
/// assert_eq!(category, Category::Home);
/// assert_eq!(category.to_string(), "Hogar");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electrónicos")]
    Electronics,
    #[serde(rename = "Ropa")]
    Clothing,
    #[serde(rename = "Hogar")]
    Home,
    #[serde(rename = "Deportes")]
    Sports,
    #[serde(rename = "Libros")]
    Books,
    #[serde(rename = "Otros")]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Home,
        Category::Sports,
        Category::Books,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electrónicos",
            Category::Clothing => "Ropa",
            Category::Home => "Hogar",
            Category::Sports => "Deportes",
            Category::Books => "Libros",
            Category::Other => "Otros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub stock: u32,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from validated input.
    pub fn create(input: NewProduct, now: DateTime<Utc>) -> Result<Self> {
        let category = input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            price: input.price,
            image: input.image.trim().to_string(),
            stock: input.stock as u32,
            category,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a validated partial update. Nothing changes when validation fails.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> Result<()> {
        let category = patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image) = patch.image {
            self.image = image.trim().to_string();
        }
        if let Some(stock) = patch.stock {
            self.stock = stock as u32;
        }
        if let Some(category) = category {
            self.category = category;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Display price, e.g. `$19.99`.
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// True when any search term appears in the name or description.
    pub fn matches_search(&self, search: &str) -> bool {
        let name = self.name.to_lowercase();
        let description = self.description.to_lowercase();
        search
            .split_whitespace()
            .map(str::to_lowercase)
            .any(|term| name.contains(&term) || description.contains(&term))
    }
}

/// Payload for `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub stock: i64,
    pub category: String,
}

impl NewProduct {
    /// Validates every field and returns the parsed category.
    pub fn validate(&self) -> Result<Category> {
        let mut v = Validator::new();
        v.text("name", &self.name, 1, NAME_MAX)
            .text("description", &self.description, 1, DESCRIPTION_MAX)
            .number_at_least("price", self.price, 0.0)
            .url("image", &self.image)
            .check(
                (0..=u32::MAX as i64).contains(&self.stock),
                "stock",
                "stock must be a non-negative integer",
            );

        let category = self.category.parse::<Category>();
        v.check(category.is_ok(), "category", "Invalid category");
        v.finish()?;

        // finish() already rejected the Err case
        category.map_err(|e| crate::StoreError::invalid_field("category", e))
    }
}

/// Payload for `PUT /api/products/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub stock: Option<i64>,
    pub category: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.stock.is_none()
            && self.category.is_none()
    }

    /// Validates the present fields and returns the parsed category, if any.
    pub fn validate(&self) -> Result<Option<Category>> {
        let mut v = Validator::new();
        v.check(!self.is_empty(), "body", "at least one field must be provided");
        if let Some(name) = &self.name {
            v.text("name", name, 1, NAME_MAX);
        }
        if let Some(description) = &self.description {
            v.text("description", description, 1, DESCRIPTION_MAX);
        }
        if let Some(price) = self.price {
            v.number_at_least("price", price, 0.0);
        }
        if let Some(image) = &self.image {
            v.url("image", image);
        }
        if let Some(stock) = self.stock {
            v.check(
                (0..=u32::MAX as i64).contains(&stock),
                "stock",
                "stock must be a non-negative integer",
            );
        }
        let category = self.category.as_deref().map(str::parse::<Category>);
        v.check(
            !matches!(category, Some(Err(_))),
            "category",
            "Invalid category",
        );
        v.finish()?;

        Ok(category.and_then(|c| c.ok()))
    }
}
