//! Test client helpers.

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Helper para tests de integracion HTTP.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
}

impl TestClient {
    /// Crea un nuevo test client con el router proporcionado.
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    /// Hace un GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, Body::empty(), Vec::new())
            .await
    }

    /// Hace un GET request con headers personalizados.
    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        self.request(Method::GET, uri, Body::empty(), headers).await
    }

    /// GET como si viniera del peer `addr` (lo que `serve` pone en `ConnectInfo`).
    pub async fn get_from(&self, uri: &str, addr: SocketAddr) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST con body JSON.
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.json_request(Method::POST, uri, body).await
    }

    /// PUT con body JSON.
    pub async fn put_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.json_request(Method::PUT, uri, body).await
    }

    /// POST con un body arbitrario (por ejemplo JSON invalido).
    pub async fn post_raw(&self, uri: &str, body: &'static str) -> TestResponse {
        self.request(
            Method::POST,
            uri,
            Body::from(body),
            vec![("content-type", "application/json")],
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Body::empty(), Vec::new())
            .await
    }

    async fn json_request(&self, method: Method, uri: &str, body: &Value) -> TestResponse {
        self.request(
            method,
            uri,
            Body::from(body.to_string()),
            vec![("content-type", "application/json")],
        )
        .await
    }

    /// Ejecuta un request arbitrario.
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        headers: Vec<(&str, &str)>,
    ) -> TestResponse {
        let mut builder = Request::builder().uri(uri).method(method);

        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        self.send(builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Wrapper sobre Response con helpers para assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    /// Retorna el body como string.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    /// Parsea el body como JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    /// Retorna un header especifico.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Valor de `X-Cache`, si lo hay.
    pub fn cache_status(&self) -> Option<&str> {
        self.header("x-cache")
    }

    /// Verifica que el status sea el esperado.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Verifica que el Content-Type contenga el valor esperado.
    pub fn assert_content_type_contains(&self, expected: &str) -> &Self {
        let content_type = self
            .header(header::CONTENT_TYPE.as_str())
            .expect("Response missing Content-Type header");

        assert!(
            content_type.contains(expected),
            "Expected Content-Type to contain '{}' but got '{}'",
            expected,
            content_type
        );
        self
    }

    /// Verifica que un header exista.
    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Expected header '{}' to exist",
            name
        );
        self
    }

    /// Verifica que un header tenga un valor especifico.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let value = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));

        assert_eq!(
            value, expected,
            "Expected header '{}' to be '{}' but got '{}'",
            name, expected, value
        );
        self
    }
}
