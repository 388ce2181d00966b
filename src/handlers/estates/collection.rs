use axum::{
    extract::multipart::Field,
    extract::{Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json},
    RequestExt,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::estate::EstateDraft;

const CREATE_FAILED: &str = "Failed to create digital estate";
const LIST_FAILED: &str = "Failed to retrieve digital estates";

/// POST /api/digital-estates - Create a record
///
/// Accepts `multipart/form-data` with fields `name`, `dob`, `assets`,
/// `beneficiaries` and an optional `file` part, or an `application/json`
/// body with the same fields (no file). Validation is the store schema's
/// job; any failure on this route is a 500 with a fixed message.
pub async fn post(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let draft = extract_draft(&state, request).await?;

    match state.store.insert_estate(draft).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => {
            tracing::error!("estate insert failed: {}", e);
            Err(ApiError::internal_server_error(CREATE_FAILED))
        }
    }
}

/// GET /api/digital-estates - List every record, store-defined order
pub async fn get(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    match state.store.list_estates().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            tracing::error!("estate list failed: {}", e);
            Err(ApiError::internal_server_error(LIST_FAILED))
        }
    }
}

async fn extract_draft(state: &AppState, request: Request) -> Result<EstateDraft, ApiError> {
    if is_multipart(&request) {
        let multipart = request
            .extract::<Multipart, _>()
            .await
            .map_err(|e| create_failed("multipart parse", &e))?;
        draft_from_multipart(state, multipart).await
    } else {
        let Json(body) = request
            .extract::<Json<Value>, _>()
            .await
            .map_err(|e| create_failed("body parse", &e))?;
        Ok(EstateDraft::from_value(body))
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn draft_from_multipart(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<EstateDraft, ApiError> {
    let mut draft = EstateDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| create_failed("multipart field", &e))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "name" => draft.name = Some(text(field).await?),
            "dob" => draft.dob = Some(text(field).await?),
            "assets" => draft.assets = Some(form_value(&text(field).await?)),
            "beneficiaries" => draft.beneficiaries = Some(form_value(&text(field).await?)),
            "file" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| create_failed("file read", &e))?;
                let stored = state
                    .files
                    .store(&original_name, &bytes)
                    .await
                    .map_err(|e| create_failed("file intake", &e))?;
                draft.file = Some(stored);
            }
            // Unknown fields are ignored, as the store schema would.
            _ => {}
        }
    }

    Ok(draft)
}

async fn text(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| create_failed("field read", &e))
}

/// Multipart text fields carry sequences as JSON; anything that does not
/// parse is taken as a single opaque entry.
fn form_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn create_failed(stage: &str, err: &dyn std::fmt::Display) -> ApiError {
    tracing::error!("estate create failed at {}: {}", stage, err);
    ApiError::internal_server_error(CREATE_FAILED)
}
