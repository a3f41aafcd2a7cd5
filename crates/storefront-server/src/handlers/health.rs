use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub cache: CacheHealth,
}

#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub enabled: bool,
    pub backend: Option<&'static str>,
    pub reachable: bool,
}

/// GET /api/health
///
/// Siempre responde OK; el estado del cache es informativo.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache();

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        cache: CacheHealth {
            enabled: cache.is_enabled(),
            backend: cache.backend(),
            reachable: cache.is_reachable().await,
        },
    })
}
