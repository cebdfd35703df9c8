//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub version: &'static str,
    pub db_connected: bool,
}

/// `GET /api/health`: core version and PostgreSQL connectivity.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        version: vibenest_core::version(),
        db_connected: vibenest_core::db::ping(&state.pool).await,
    }))
}
