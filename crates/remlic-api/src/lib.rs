//! # remlic-api
//!
//! HTTP API layer for RemLic built on Axum.
//!
//! Provides the public contact and PSIRA proxy endpoints, the
//! authenticated license, dashboard and limit endpoints, middleware
//! (CORS, request logging, tracing, compression), extractors, DTOs and
//! error mapping.

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
