//! PSIRA registry proxy handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use remlic_core::error::ErrorKind;
use remlic_service::{PsiraLookup, PsiraOutcome};

use crate::state::AppState;

/// POST /api/psira-proxy
pub async fn lookup(
    State(state): State<AppState>,
    body: Result<Json<PsiraLookup>, JsonRejection>,
) -> Response {
    let lookup = body.map(|Json(l)| l).unwrap_or_default();

    match state.psira_client.lookup(&lookup).await {
        Ok(PsiraOutcome::Found(data)) => (StatusCode::OK, Json(data)).into_response(),
        Ok(PsiraOutcome::Rejected { status, details }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(json!({ "error": "PSIRA API request failed", "details": details })),
            )
                .into_response()
        }
        Err(e) if e.kind == ErrorKind::Validation => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.message }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "PSIRA proxy error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "message": e.message })),
            )
                .into_response()
        }
    }
}

/// Any method other than POST on /api/psira-proxy.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
