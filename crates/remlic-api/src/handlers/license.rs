//! License record handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use remlic_core::error::AppError;
use remlic_service::TypeEntry;
use remlic_service::license::{CreateOutcome, PauseOutcome, auto_dash};

use crate::dto::request::{CreateLicenseRequest, DeleteQuery, PauseRequest, RenewRequest};
use crate::dto::response::ApiResponse;
use crate::error::validation_error;
use crate::extractors::AuthUser;
use crate::extractors::path::{parse_license_id, parse_license_type};
use crate::state::AppState;

/// POST /api/licenses/{type}
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(license_type): Path<String>,
    Json(req): Json<CreateLicenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateOutcome>>), AppError> {
    let kind = parse_license_type(&license_type)?;

    let outcome = state
        .license_service
        .create(&auth, kind, req.expiry_date.as_deref(), req.fields)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome))))
}

/// PUT /api/licenses/{type}/{id}/renew
pub async fn renew(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((license_type, id)): Path<(String, String)>,
    Json(req): Json<RenewRequest>,
) -> Result<Json<ApiResponse<TypeEntry>>, AppError> {
    req.validate().map_err(validation_error)?;
    let kind = parse_license_type(&license_type)?;
    let id = parse_license_id(&id)?;

    let expiry_date = if req.expiry_date.chars().all(|c| c.is_ascii_digit()) {
        auto_dash(&req.expiry_date).unwrap_or(req.expiry_date)
    } else {
        req.expiry_date
    };

    let entry = state
        .license_service
        .renew(&auth, kind, id, &expiry_date)
        .await?;

    Ok(Json(ApiResponse::ok(entry)))
}

/// PUT /api/licenses/{type}/{id}/pause
pub async fn pause(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((license_type, id)): Path<(String, String)>,
    Json(req): Json<PauseRequest>,
) -> Result<Json<ApiResponse<PauseOutcome>>, AppError> {
    let kind = parse_license_type(&license_type)?;
    let id = parse_license_id(&id)?;

    let outcome = state
        .license_service
        .set_paused(&auth, kind, id, req.paused, req.confirmed)
        .await?;

    Ok(Json(ApiResponse::ok(outcome)))
}

/// DELETE /api/licenses/{type}/{id}?confirmed=true
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((license_type, id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind = parse_license_type(&license_type)?;
    let id = parse_license_id(&id)?;

    state
        .license_service
        .delete(&auth, kind, id, query.confirmed)
        .await?;

    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "License deleted" } }),
    ))
}
