//! Route definitions.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Builds the complete API router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api = Router::new()
        .merge(health_routes())
        .merge(public_routes())
        .merge(license_routes())
        .merge(limit_routes());

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contact",
            post(handlers::contact::submit).fallback(handlers::contact::method_not_allowed),
        )
        .route(
            "/psira-proxy",
            post(handlers::psira::lookup).fallback(handlers::psira::method_not_allowed),
        )
}

fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/licenses", get(handlers::dashboard::dashboard))
        .route("/licenses/{type}", post(handlers::license::create))
        .route(
            "/licenses/{type}/{id}",
            axum::routing::delete(handlers::license::delete),
        )
        .route("/licenses/{type}/{id}/renew", put(handlers::license::renew))
        .route("/licenses/{type}/{id}/pause", put(handlers::license::pause))
}

fn limit_routes() -> Router<AppState> {
    Router::new().route("/limits/{type}", get(handlers::limit::check))
}
