use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::NOT_FOUND;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::estate::EstatePatch;

const GET_FAILED: &str = "Failed to retrieve digital estate";
const UPDATE_FAILED: &str = "Failed to update digital estate";
const DELETE_FAILED: &str = "Failed to delete digital estate";

/// A path id that is not a well-formed UUID names no record, so it is not
/// found; the store is only ever consulted with typed ids.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(NOT_FOUND))
}

/// GET /api/digital-estates/:id - Get a single record by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    match state.store.find_estate(id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => {
            tracing::error!("estate lookup failed: {}", e);
            Err(ApiError::internal_server_error(GET_FAILED))
        }
    }
}

/// PUT /api/digital-estates/:id - Merge patch fields onto a record
///
/// Fields present in the body overwrite stored values; absent fields
/// persist. Returns the post-update record.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let patch: EstatePatch = serde_json::from_value(body).map_err(|e| {
        tracing::error!("estate patch rejected: {}", e);
        ApiError::internal_server_error(UPDATE_FAILED)
    })?;

    match state.store.update_estate(id, patch).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => {
            tracing::error!("estate update failed: {}", e);
            Err(ApiError::internal_server_error(UPDATE_FAILED))
        }
    }
}

/// DELETE /api/digital-estates/:id - Remove a record
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    match state.store.delete_estate(id).await {
        Ok(true) => Ok((
            StatusCode::OK,
            Json(json!({ "message": "Digital estate deleted successfully" })),
        )),
        Ok(false) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => {
            tracing::error!("estate delete failed: {}", e);
            Err(ApiError::internal_server_error(DELETE_FAILED))
        }
    }
}
