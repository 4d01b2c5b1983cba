//! Limit check handler.

use axum::Json;
use axum::extract::{Path, State};

use remlic_core::error::AppError;

use crate::dto::response::{ApiResponse, LimitResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/limits/{type}
///
/// Unknown types are answered, not rejected: they carry a limit of zero.
pub async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(license_type): Path<String>,
) -> Result<Json<ApiResponse<LimitResponse>>, AppError> {
    let check = state.limit_service.check(&auth, &license_type).await?;

    Ok(Json(ApiResponse::ok(LimitResponse {
        license_type,
        message: check.message(),
        check,
    })))
}
