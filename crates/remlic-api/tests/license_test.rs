//! Authenticated license, dashboard and limit endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::TestApp;

fn driver() -> Value {
    json!({
        "first_name": "Sipho",
        "last_name": "Nkosi",
        "id_number": "8501015800088",
        "expiry_date": "2031-03-15"
    })
}

#[tokio::test]
async fn test_requires_token() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/api/licenses", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rejects_bad_token() {
    let app = TestApp::new();
    let (status, _) = app
        .request(Method::GET, "/api/licenses", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_free_tier_limit_enforced() {
    let app = TestApp::new();
    let (_, token) = app.user(None);

    let (status, body) = app
        .request(Method::POST, "/api/licenses/drivers", Some(&token), Some(driver()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["record"]["first_name"], "Sipho");
    assert_eq!(body["data"]["record"]["type"], "drivers");

    let (status, body) = app
        .request(Method::POST, "/api/licenses/drivers", Some(&token), Some(driver()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "LIMIT_EXCEEDED");
    assert_eq!(body["message"], "License limit (1) reached for your free tier");
}

#[tokio::test]
async fn test_registered_user_gets_one_psira_record() {
    let app = TestApp::new();
    let (_, token) = app.user(Some("registered"));
    let psira = json!({ "first_name": "A", "last_name": "B", "psira_number": "S1" });

    let (status, _) = app
        .request(Method::POST, "/api/licenses/psira", Some(&token), Some(psira.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(Method::POST, "/api/licenses/psira", Some(&token), Some(psira))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "License limit (1) reached for your free tier");
}

#[tokio::test]
async fn test_create_validates_fields() {
    let app = TestApp::new();
    let (_, token) = app.user(Some("premium"));

    let (status, body) = app
        .request(
            Method::POST,
            "/api/licenses/vehicles",
            Some(&token),
            Some(json!({ "make": "Toyota" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("model, registration_number")
    );

    let (status, _) = app
        .request(Method::POST, "/api/licenses/boats", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_renew_pause_delete_flow() {
    let app = TestApp::new();
    let (_, token) = app.user(Some("basic"));

    let (_, body) = app
        .request(Method::POST, "/api/licenses/drivers", Some(&token), Some(driver()))
        .await;
    let id = body["data"]["record"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/licenses/drivers/{id}/renew"),
            Some(&token),
            Some(json!({ "expiry_date": "20350101" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["records"][0]["expiry_date"], "2035-01-01");
    assert_eq!(body["data"]["records"][0]["status"]["is_valid"], true);

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/licenses/drivers/{id}/renew"),
            Some(&token),
            Some(json!({ "expiry_date": "2035-02-30" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let pause_uri = format!("/api/licenses/drivers/{id}/pause");
    let (status, body) = app
        .request(Method::PUT, &pause_uri, Some(&token), Some(json!({ "paused": true })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFIRMATION_REQUIRED");

    let (status, body) = app
        .request(
            Method::PUT,
            &pause_uri,
            Some(&token),
            Some(json!({ "paused": true, "confirmed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notifications_paused"], true);

    let (status, _) = app
        .request(Method::PUT, &pause_uri, Some(&token), Some(json!({ "paused": false })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let delete_uri = format!("/api/licenses/drivers/{id}");
    let (status, _) = app
        .request(Method::DELETE, &delete_uri, Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("{delete_uri}?confirmed=true"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("{delete_uri}?confirmed=true"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Driver's license not found");
}

#[tokio::test]
async fn test_records_are_private_to_owner() {
    let app = TestApp::new();
    let (_, owner) = app.user(None);
    let (_, other) = app.user(None);

    let (_, body) = app
        .request(Method::POST, "/api/licenses/drivers", Some(&owner), Some(driver()))
        .await;
    let id = body["data"]["record"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/licenses/drivers/{id}?confirmed=true"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_lists_every_type() {
    let app = TestApp::new();
    let (_, token) = app.user(None);
    app.request(Method::POST, "/api/licenses/drivers", Some(&token), Some(driver()))
        .await;

    let (status, body) = app
        .request(Method::GET, "/api/licenses", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 10);
    let drivers = entries
        .iter()
        .find(|e| e["license_type"] == "drivers")
        .unwrap();
    assert_eq!(drivers["count"], 1);
    assert_eq!(drivers["limit_reached"], true);
    assert_eq!(body["data"]["tier"], "free");
}

#[tokio::test]
async fn test_dashboard_search_and_section() {
    let app = TestApp::new();
    let (_, token) = app.user(Some("premium"));
    app.request(Method::POST, "/api/licenses/drivers", Some(&token), Some(driver()))
        .await;

    let (_, body) = app
        .request(
            Method::GET,
            "/api/licenses?search=nkosi&section=drivers",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["data"]["selected_section"], "drivers");
    let visible = body["data"]["visible"].as_array().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["records"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .request(Method::GET, "/api/licenses?search=zzz", Some(&token), None)
        .await;
    let visible = body["data"]["visible"].as_array().unwrap();
    assert!(visible.iter().all(|e| e["records"].as_array().unwrap().is_empty()));

    let (status, _) = app
        .request(Method::GET, "/api/licenses?section=boats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_limit_endpoint() {
    let app = TestApp::new();
    let (_, token) = app.user(Some("standard"));

    let (status, body) = app
        .request(Method::GET, "/api/limits/firearms", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["allowed"], true);
    assert_eq!(body["data"]["remaining"], 8);
    assert_eq!(body["data"]["tier"], "standard");

    let (_, body) = app
        .request(Method::GET, "/api/limits/boats", Some(&token), None)
        .await;
    assert_eq!(body["data"]["allowed"], false);
    assert!(body["data"]["message"].is_string());
}
