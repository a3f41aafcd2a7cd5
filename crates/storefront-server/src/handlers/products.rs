//! Catalog endpoint handlers.
//!
//! The GET routes are wrapped by the response cache in `server.rs`; the
//! mutations here invalidate the affected entries once the repository call
//! succeeds.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use storefront_core::{Category, NewProduct, Product, ProductPatch, ProductQuery};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::response::{DataResponse, PageResponse};
use crate::state::AppState;

fn product_id(path: Result<Path<String>, PathRejection>) -> Result<Uuid, AppError> {
    let Path(raw) = path?;
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid product id '{raw}'")))
}

/// GET /api/products
#[instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<PageResponse<Product>>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let page = state.products().list(&query).await?;
    Ok(Json(page.into()))
}

/// GET /api/products/{id}
#[instrument(skip_all)]
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<Product>>, AppError> {
    let id = product_id(path)?;
    let product = state.products().get(id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// GET /api/products/categories/list
#[instrument(skip_all)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Category>>>, AppError> {
    let categories = state.products().categories().await?;
    Ok(Json(DataResponse::new(categories)))
}

/// POST /api/products
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Product>>), AppError> {
    let Json(input) = body?;
    let product = state.products().create(input).await?;

    state.cache().invalidate_product_listings().await;

    info!(id = %product.id, name = %product.name, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(product, "Product created")),
    ))
}

/// PUT /api/products/{id}
#[instrument(skip_all)]
pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<DataResponse<Product>>, AppError> {
    let id = product_id(path)?;
    let Json(patch) = body?;
    let product = state.products().update(id, patch).await?;

    state.cache().invalidate_product(&id.to_string()).await;

    info!(id = %id, "Product updated");
    Ok(Json(DataResponse::with_message(product, "Product updated")))
}

/// DELETE /api/products/{id}
#[instrument(skip_all)]
pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<Product>>, AppError> {
    let id = product_id(path)?;
    let product = state.products().delete(id).await?;

    state.cache().invalidate_product(&id.to_string()).await;

    info!(id = %id, "Product deleted");
    Ok(Json(DataResponse::with_message(product, "Product deleted")))
}
