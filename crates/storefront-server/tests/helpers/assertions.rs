//! Custom assertions para tests.

use serde_json::Value;

/// Verifica el envelope `{ success: true, data }`.
pub fn assert_success_envelope(json: &Value) {
    assert!(json.is_object(), "Response should be a JSON object");
    assert_eq!(json["success"], true, "Expected success=true: {json}");
    assert!(json.get("data").is_some(), "Missing 'data' field");
}

/// Verifica el envelope de error `{ success: false, message }`.
pub fn assert_error_envelope(json: &Value) {
    assert_eq!(json["success"], false, "Expected success=false: {json}");
    assert!(json["message"].is_string(), "'message' should be a string");
}

/// Verifica que un error de validacion mencione `field`.
pub fn assert_field_error(json: &Value, field: &str) {
    assert_error_envelope(json);
    let errors = json["errors"]
        .as_array()
        .unwrap_or_else(|| panic!("Missing 'errors' array: {json}"));
    assert!(
        errors.iter().any(|e| e["field"] == field),
        "Expected a field error for '{field}', got {json}"
    );
}

/// Verifica el schema de la paginacion de un listado.
pub fn assert_pagination_schema(json: &Value) {
    let pagination = json["pagination"]
        .as_object()
        .expect("Missing 'pagination' object");

    for key in [
        "page",
        "limit",
        "total",
        "totalPages",
        "hasNextPage",
        "hasPrevPage",
        "nextPage",
        "prevPage",
    ] {
        assert!(pagination.contains_key(key), "Pagination missing '{key}'");
    }
    assert!(json["data"].is_array(), "'data' should be an array");
}
