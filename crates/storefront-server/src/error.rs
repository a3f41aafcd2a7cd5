use std::time::Duration;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use storefront_core::{FieldError, StoreError};
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    /// Recurso no encontrado
    NotFound(String),

    /// Parametros invalidos
    BadRequest(String),

    /// Errores de validacion por campo
    Validation(Vec<FieldError>),

    /// Body mas grande que el limite configurado
    PayloadTooLarge(String),

    /// Rate limit agotado; `retry_after` va en el header `Retry-After`
    TooManyRequests {
        message: String,
        retry_after: Duration,
    },

    /// Error interno
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut retry_after = None;
        let (message, errors) = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg) => (msg, None),
            AppError::TooManyRequests {
                message,
                retry_after: wait,
            } => {
                retry_after = Some(wait);
                (message, None)
            },
            AppError::Validation(errors) => ("Invalid input data".to_string(), Some(errors)),
            AppError::Internal(msg) => {
                // El detalle queda en el log, no en la respuesta
                error!(error = %msg, "Internal server error");
                ("Internal server error".to_string(), None)
            },
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        let mut response = (status, body).into_response();
        if let Some(wait) = retry_after {
            // Segundos enteros, redondeando hacia arriba
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        }
        response
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => AppError::Validation(errors),
            StoreError::ProductNotFound { .. } | StoreError::OrderNotFound { .. } => {
                AppError::NotFound(err.to_string())
            },
            StoreError::InsufficientStock { .. } => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
