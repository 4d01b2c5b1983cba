//! Contact form handler.
//!
//! Responds with `{success, message}` in every case rather than the
//! standard error envelope.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use remlic_core::error::ErrorKind;
use remlic_service::ContactMessage;

use crate::dto::response::ContactResponse;
use crate::state::AppState;

const THANK_YOU: &str = "Thank you for your message! We will get back to you soon.";
const SEND_FAILED: &str = "Failed to send message. Please try again later.";

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<ContactMessage>, JsonRejection>,
) -> Response {
    // An unreadable body is treated as an empty form.
    let message = body.map(|Json(m)| m).unwrap_or_default();

    match state.contact_service.submit(&message) {
        Ok(()) => (StatusCode::OK, Json(ContactResponse::new(true, THANK_YOU))).into_response(),
        Err(e) if e.kind == ErrorKind::Validation => {
            (StatusCode::BAD_REQUEST, Json(ContactResponse::new(false, e.message))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Contact form error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse::new(false, SEND_FAILED)),
            )
                .into_response()
        }
    }
}

/// Any method other than POST on /api/contact.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ContactResponse::new(false, "Method not allowed")),
    )
        .into_response()
}
