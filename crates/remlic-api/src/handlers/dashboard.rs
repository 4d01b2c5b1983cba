//! Dashboard handler.

use axum::Json;
use axum::extract::{Query, State};

use remlic_core::error::AppError;

use crate::dto::request::DashboardQuery;
use crate::dto::response::{ApiResponse, DashboardResponse};
use crate::extractors::AuthUser;
use crate::extractors::path::parse_license_type;
use crate::state::AppState;

/// GET /api/licenses
///
/// A newer request from the same user cancels this one, which then
/// answers 499.
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    let section = query
        .section
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_license_type)
        .transpose()?;

    let snapshot = state
        .dashboard_service
        .snapshot(&auth, query.search.as_deref(), section)
        .await?;

    Ok(Json(ApiResponse::ok(snapshot.into())))
}
