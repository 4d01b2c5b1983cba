//! Convenience result type alias for RemLic.

use crate::error::AppError;

/// A specialized `Result` type for RemLic operations.
pub type AppResult<T> = Result<T, AppError>;
