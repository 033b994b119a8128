//! Contact form endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::ContactResponse;

/// POST /contact - Validate and store a contact submission
///
/// Malformed JSON and schema violations are answered with 422 before the
/// datastore is contacted. A missing JSON content type gets 415 and an
/// oversized body 413.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("Rejected contact body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let id = state.contact_service.submit(payload).await?;
    Ok(Json(ContactResponse { ok: true, id }))
}
