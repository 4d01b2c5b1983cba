//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use remlic_api::auth::Claims;
use remlic_api::{AppState, build_app};
use remlic_core::config::AppConfig;
use remlic_core::types::UserId;
use remlic_database::MemoryStore;
use remlic_entity::user::Profile;

pub const JWT_SECRET: &str = "integration-secret";

/// An app over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_psira_url("http://127.0.0.1:9/unreachable")
    }

    pub fn with_psira_url(url: &str) -> Self {
        Self::build(MemoryStore::new(), url)
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self::build(store, "http://127.0.0.1:9/unreachable")
    }

    fn build(store: MemoryStore, psira_url: &str) -> Self {
        let config = AppConfig::from_toml(&format!(
            r#"
            mode = "test"

            [backend]
            jwt_secret = "{JWT_SECRET}"

            [psira]
            api_url = "{psira_url}"
            timeout_seconds = 5
            "#
        ))
        .expect("test config");

        let store_arc = Arc::new(store.clone());
        let state = AppState::new(Arc::new(config), store_arc.clone(), store_arc)
            .expect("app state");

        Self {
            router: build_app(state),
            store,
        }
    }

    /// Register a user with the given `type_of_user` and return a token.
    pub fn user(&self, tier: Option<&str>) -> (UserId, String) {
        let user_id = UserId::new();
        let mut profile = Profile::new(user_id);
        profile.type_of_user = tier.map(String::from);
        self.store.put_profile(profile);
        (user_id, token_for(user_id))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

pub fn token_for(user_id: UserId) -> String {
    let claims = Claims {
        sub: *user_id.as_uuid(),
        exp: chrono::Utc::now().timestamp() + 3600,
        aud: Some("authenticated".into()),
        email: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
