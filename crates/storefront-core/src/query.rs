//! Product listing: filtering, sorting and pagination.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::product::Product;
use crate::validate::Validator;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 12;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    Price,
    Stock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string of `GET /api/products`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(alias = "sortBy")]
    pub sort: Option<SortField>,
    #[serde(alias = "sortOrder")]
    pub order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.check(self.page() >= 1, "page", "page must be >= 1").check(
            (1..=MAX_LIMIT).contains(&self.limit()),
            "limit",
            format!("limit must be between 1 and {MAX_LIMIT}"),
        );
        if let Some(min) = self.min_price {
            v.number_at_least("minPrice", min, 0.0);
        }
        if let Some(max) = self.max_price {
            v.number_at_least("maxPrice", max, 0.0);
        }
        v.finish()
    }

    /// True when the product passes every filter in the query.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if product.category.as_str() != category {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => product.matches_search(search),
            _ => true,
        }
    }

    /// Filters, sorts and paginates `products`.
    ///
    /// The sort is stable, so products that compare equal keep their input
    /// order.
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Page<Product> {
        let mut matched: Vec<&Product> = products.into_iter().filter(|p| self.matches(p)).collect();

        let field = self.sort.unwrap_or_default();
        let order = self.order.unwrap_or_default();
        matched.sort_by(|a, b| {
            let ordering = compare(a, b, field);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let pagination = Pagination::new(self.page(), self.limit(), total);
        let skip = (u64::from(pagination.page) - 1) * u64::from(pagination.limit);
        let data = matched
            .into_iter()
            .skip(skip as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect();

        Page { data, pagination }
    }
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Stock => a.stock.cmp(&b.stock),
    }
}

/// Pagination metadata returned next to a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

impl Pagination {
    /// ```
    /// let p = storefront_core::Pagination::new(2, 12, 30);
    /// assert_eq!(p.total_pages, 3);
    /// assert_eq!(p.next_page, Some(3));
    /// assert_eq!(p.prev_page, Some(1));
    /// ```
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit));
        let has_next_page = u64::from(page) < total_pages;
        let has_prev_page = page > 1;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
