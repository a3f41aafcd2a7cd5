//! JSON envelopes shared by the API handlers.

use serde::Serialize;
use storefront_core::{Page, Pagination};

/// `{ success, message?, data }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Pagina de resultados con su metadata de paginacion.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            data: page.data,
            pagination: page.pagination,
        }
    }
}

/// `{ success, count, data }`
#[derive(Debug, Serialize)]
pub struct CountResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> CountResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}
