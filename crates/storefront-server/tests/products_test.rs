//! Tests de los endpoints del catalogo.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use helpers::*;

// === Listado ===

#[tokio::test]
async fn list_returns_page_with_pagination() {
    let app = app_without_cache();

    let response = app.client.get("/api/products").await;
    response
        .assert_status(StatusCode::OK)
        .assert_content_type_contains("application/json");

    let json: Value = response.json();
    assert_success_envelope(&json);
    assert_pagination_schema(&json);
    assert_eq!(json["pagination"]["total"], 12);
    assert_eq!(json["pagination"]["limit"], 12);
    assert_eq!(json["data"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn list_filters_by_category_and_price() {
    let app = app_without_cache();

    let json: Value = app
        .client
        .get("/api/products?category=Hogar&maxPrice=100")
        .await
        .json();

    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Cafetera Automática"));
    assert!(names.contains(&"Lámpara de Mesa LED"));
}

#[tokio::test]
async fn list_sorts_by_price_ascending() {
    let app = app_without_cache();

    let json: Value = app
        .client
        .get("/api/products?sort=price&order=asc&limit=3")
        .await
        .json();

    let prices: Vec<f64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![19.99, 24.99, 45.99]);
    assert_eq!(json["pagination"]["hasNextPage"], true);
    assert_eq!(json["pagination"]["nextPage"], 2);
}

#[tokio::test]
async fn list_searches_name_and_description() {
    let app = app_without_cache();

    let json: Value = app.client.get("/api/products?search=bater%C3%ADa").await.json();

    // MacBook y auriculares mencionan la bateria
    assert_eq!(json["pagination"]["total"], 2);
}

#[tokio::test]
async fn list_rejects_invalid_pagination() {
    let app = app_without_cache();

    let response = app.client.get("/api/products?limit=500").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_field_error(&response.json(), "limit");

    app.client
        .get("/api/products?page=abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// === Detalle ===

#[tokio::test]
async fn get_product_by_id() {
    let app = app_without_cache();
    let id = app.any_product_id().await;

    let response = app.client.get(&format!("/api/products/{id}")).await;
    response.assert_status(StatusCode::OK);

    let json: Value = response.json();
    assert_success_envelope(&json);
    assert_eq!(json["data"]["id"], id.as_str());
    assert!(json["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn unknown_product_is_404() {
    let app = app_without_cache();

    let response = app
        .client
        .get(&format!("/api/products/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_error_envelope(&response.json());
}

#[tokio::test]
async fn malformed_id_is_400() {
    let app = app_without_cache();

    app.client
        .get("/api/products/123")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn categories_are_distinct_and_sorted() {
    let app = app_without_cache();

    let json: Value = app.client.get("/api/products/categories/list").await.json();

    assert_eq!(
        json["data"],
        json!(["Deportes", "Electrónicos", "Hogar", "Libros", "Ropa"])
    );
}

// === Escritura ===

#[tokio::test]
async fn create_product_returns_201() {
    let app = app_without_cache();

    let response = app
        .client
        .post_json("/api/products", &new_product("Termo de acero"))
        .await;
    response.assert_status(StatusCode::CREATED);

    let json: Value = response.json();
    assert_success_envelope(&json);
    assert_eq!(json["data"]["name"], "Termo de acero");
    assert_eq!(json["data"]["category"], "Hogar");

    let id = json["data"]["id"].as_str().unwrap();
    app.client
        .get(&format!("/api/products/{id}"))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn create_product_reports_every_invalid_field() {
    let app = app_without_cache();

    let response = app
        .client
        .post_json(
            "/api/products",
            &json!({
                "name": "",
                "description": "ok",
                "price": -3,
                "image": "not a url",
                "stock": 1,
                "category": "Juguetes"
            }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let json: Value = response.json();
    for field in ["name", "price", "image", "category"] {
        assert_field_error(&json, field);
    }
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app_without_cache();

    let response = app.client.post_raw("/api/products", "{ not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_error_envelope(&response.json());
}

#[tokio::test]
async fn update_product_partially() {
    let app = app_without_cache();
    let id = app.any_product_id().await;
    let uri = format!("/api/products/{id}");

    let before: Value = app.client.get(&uri).await.json();

    let response = app.client.put_json(&uri, &json!({ "stock": 7 })).await;
    response.assert_status(StatusCode::OK);

    let json: Value = response.json();
    assert_eq!(json["data"]["stock"], 7);
    assert_eq!(json["data"]["name"], before["data"]["name"]);
}

#[tokio::test]
async fn update_with_empty_body_is_rejected() {
    let app = app_without_cache();
    let id = app.any_product_id().await;

    app.client
        .put_json(&format!("/api/products/{id}"), &json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_unknown_product_is_404() {
    let app = app_without_cache();

    app.client
        .put_json(
            &format!("/api/products/{}", Uuid::new_v4()),
            &json!({ "price": 5 }),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_product_then_404() {
    let app = app_without_cache();
    let id = app.any_product_id().await;
    let uri = format!("/api/products/{id}");

    app.client.delete(&uri).await.assert_status(StatusCode::OK);
    app.client
        .get(&uri)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.client
        .delete(&uri)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let app = app_without_cache();

    let response = app.client.get("/api/nothing-here").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_error_envelope(&response.json());
}
