//! Tests de los endpoints de ordenes.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use helpers::*;

fn order(product: &str, quantity: i64, email: &str) -> Value {
    json!({
        "customerName": "Ana Pérez",
        "customerEmail": email,
        "customerAddress": "Av. Siempre Viva 742",
        "items": [{ "product": product, "quantity": quantity }],
        "total": 99.5
    })
}

async fn stock_of(app: &TestApp, id: &str) -> u64 {
    let json: Value = app.client.get(&format!("/api/products/{id}")).await.json();
    json["data"]["stock"].as_u64().unwrap()
}

#[tokio::test]
async fn create_order_returns_receipt() {
    let app = app_without_cache();
    let id = app.any_product_id().await;

    let response = app
        .client
        .post_json("/api/orders", &order(&id, 1, "ana@example.com"))
        .await;
    response.assert_status(StatusCode::CREATED);

    let json: Value = response.json();
    assert_success_envelope(&json);
    assert!(json["data"]["orderNumber"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(json["data"]["status"], "Pendiente");
    assert_eq!(json["data"]["total"], 99.5);
    assert!(json["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn create_order_decrements_stock() {
    let app = app_without_cache();
    let id = app.any_product_id().await;
    let before = stock_of(&app, &id).await;

    app.client
        .post_json("/api/orders", &order(&id, 3, "ana@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(stock_of(&app, &id).await, before - 3);
}

#[tokio::test]
async fn insufficient_stock_is_400_and_changes_nothing() {
    let app = app_without_cache();
    let id = app.any_product_id().await;
    let before = stock_of(&app, &id).await;

    let response = app
        .client
        .post_json(
            "/api/orders",
            &order(&id, before as i64 + 1, "ana@example.com"),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Insufficient stock"));

    assert_eq!(stock_of(&app, &id).await, before);
}

#[tokio::test]
async fn unknown_product_in_order_is_404() {
    let app = app_without_cache();

    app.client
        .post_json(
            "/api/orders",
            &order(&Uuid::new_v4().to_string(), 1, "ana@example.com"),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_order_lists_field_errors() {
    let app = app_without_cache();

    let response = app
        .client
        .post_json(
            "/api/orders",
            &json!({
                "customerName": "",
                "customerEmail": "not-an-email",
                "customerAddress": "Calle 1",
                "items": [{ "product": "xyz", "quantity": 0 }],
                "total": 10
            }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let json: Value = response.json();
    for field in [
        "customerName",
        "customerEmail",
        "items[0].product",
        "items[0].quantity",
    ] {
        assert_field_error(&json, field);
    }
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let app = app_without_cache();

    let response = app
        .client
        .post_json(
            "/api/orders",
            &json!({
                "customerName": "Ana",
                "customerEmail": "ana@example.com",
                "customerAddress": "Calle 1",
                "items": [],
                "total": 0
            }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_field_error(&response.json(), "items");
}

#[tokio::test]
async fn get_order_by_number() {
    let app = app_without_cache();
    let id = app.any_product_id().await;

    let created: Value = app
        .client
        .post_json("/api/orders", &order(&id, 1, "ana@example.com"))
        .await
        .json();
    let number = created["data"]["orderNumber"].as_str().unwrap();

    let response = app.client.get(&format!("/api/orders/{number}")).await;
    response.assert_status(StatusCode::OK);

    let json: Value = response.json();
    assert_eq!(json["data"]["orderNumber"], number);
    assert_eq!(json["data"]["items"][0]["product"], id.as_str());
    assert_eq!(json["data"]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn unknown_order_is_404() {
    let app = app_without_cache();

    app.client
        .get("/api/orders/ORD-0-0")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_by_email_newest_first() {
    let app = app_without_cache();
    let id = app.any_product_id().await;

    let mut numbers = Vec::new();
    for email in ["ana@example.com", "otro@example.com", "Ana@Example.com"] {
        let json: Value = app
            .client
            .post_json("/api/orders", &order(&id, 1, email))
            .await
            .json();
        numbers.push(json["data"]["orderNumber"].as_str().unwrap().to_string());
    }

    let json: Value = app.client.get("/api/orders?email=ana@example.com").await.json();

    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["orderNumber"], numbers[2].as_str());
    assert_eq!(json["data"][1]["orderNumber"], numbers[0].as_str());
}

#[tokio::test]
async fn orders_by_email_requires_email() {
    let app = app_without_cache();

    let response = app.client.get("/api/orders").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_error_envelope(&response.json());

    app.client
        .get("/api/orders?email=")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
