//! # remlic-core
//!
//! Core crate for RemLic. Contains the configuration schema, typed
//! identifiers, the license limit value type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other RemLic crates.

pub mod config;
pub mod error;
#[cfg(feature = "axum")]
pub mod http;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
