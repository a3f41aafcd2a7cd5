//! HTTP handlers.

pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod response;

use axum::http::Uri;

use crate::error::AppError;

/// Fallback para rutas desconocidas.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}
