//! Liveness and datastore check endpoints

use axum::{extract::State, Json};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{HealthResponse, OkResponse};

/// GET / - Liveness check, never touches the datastore
pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /test - Datastore connectivity check
///
/// Lists the collections; any failure is reported as a 500 carrying the
/// underlying message.
pub async fn test_db(State(state): State<AppState>) -> Result<Json<OkResponse>, ApiError> {
    let collections = state.health_service.check_datastore().await?;
    tracing::debug!("Datastore reachable, {} collection(s)", collections.len());
    Ok(Json(OkResponse { ok: true }))
}
