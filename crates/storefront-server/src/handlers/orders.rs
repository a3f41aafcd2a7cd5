//! Order endpoint handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::{NewOrder, Order, OrderStatus};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::handlers::response::{CountResponse, DataResponse};
use crate::state::AppState;

/// Resumen devuelto al crear una orden.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_number: String,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderReceipt {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrdersByEmail {
    pub email: Option<String>,
}

/// POST /api/orders
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<OrderReceipt>>), AppError> {
    let Json(input) = body?;
    let request = input.validate()?;
    let order = state.orders().place(request).await?;

    // El stock cambio: el detalle y los listados cacheados quedan viejos
    let mut invalidated: Vec<_> = order.items.iter().map(|item| item.product).collect();
    invalidated.sort_unstable();
    invalidated.dedup();
    let invalidated: Vec<String> = invalidated.iter().map(|id| id.to_string()).collect();
    state.cache().invalidate_products(invalidated).await;

    info!(
        order_number = %order.order_number,
        items = order.items.len(),
        total = order.total,
        "Order created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            OrderReceipt::from(&order),
            "Order created",
        )),
    ))
}

/// GET /api/orders/{orderNumber}
#[instrument(skip_all, fields(order_number = %order_number))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<DataResponse<Order>>, AppError> {
    let order = state.orders().find_by_number(&order_number).await?;
    Ok(Json(DataResponse::new(order)))
}

/// GET /api/orders?email=
#[instrument(skip_all)]
pub async fn list_orders_by_email(
    State(state): State<AppState>,
    query: Result<Query<OrdersByEmail>, QueryRejection>,
) -> Result<Json<CountResponse<Order>>, AppError> {
    let Query(query) = query?;
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required to look up orders".to_string()))?;

    let orders = state.orders().find_by_email(email).await?;
    Ok(Json(CountResponse::new(orders)))
}
