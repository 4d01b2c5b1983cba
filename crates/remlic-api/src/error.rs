//! Maps domain `AppError` to HTTP responses.

use remlic_core::error::AppError;

pub use remlic_core::http::{ApiErrorResponse, CLIENT_CLOSED_REQUEST, status_for};

/// Convert validator failures into a validation error.
pub fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");
    AppError::validation(message)
}
