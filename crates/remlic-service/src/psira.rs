//! PSIRA registry lookup client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info};

use remlic_core::config::PsiraConfig;
use remlic_core::error::{AppError, ErrorKind};
use remlic_core::result::AppResult;

/// A lookup request as posted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsiraLookup {
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub psira_number: Option<String>,
    /// Send the PSIRA number instead of the ID number.
    #[serde(default)]
    pub uses_psira_number: bool,
}

impl PsiraLookup {
    /// The JSON body to send upstream. The selected identifier is omitted
    /// when blank, leaving `{}`.
    pub fn upstream_body(&self) -> AppResult<Value> {
        let id_number = non_blank(self.id_number.as_deref());
        let psira_number = non_blank(self.psira_number.as_deref());

        if id_number.is_none() && psira_number.is_none() {
            return Err(AppError::validation(
                "Either idNumber or psiraNumber is required",
            ));
        }

        let (key, value) = if self.uses_psira_number {
            ("psiraNumber", psira_number)
        } else {
            ("idNumber", id_number)
        };
        let mut body = Map::new();
        if let Some(value) = value {
            body.insert(key.to_string(), Value::String(value.to_string()));
        }
        Ok(Value::Object(body))
    }
}

/// What the upstream said.
#[derive(Debug, Clone, PartialEq)]
pub enum PsiraOutcome {
    /// Parsed JSON from a successful response.
    Found(Value),
    /// A non-success response, passed through to the caller.
    Rejected { status: u16, details: String },
}

/// HTTP client for the PSIRA applicant-details endpoint.
#[derive(Debug, Clone)]
pub struct PsiraClient {
    http: reqwest::Client,
    api_url: String,
}

impl PsiraClient {
    /// Build a client from configuration.
    pub fn new(config: &PsiraConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build PSIRA client", e)
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
        })
    }

    /// Forward one lookup upstream.
    pub async fn lookup(&self, lookup: &PsiraLookup) -> AppResult<PsiraOutcome> {
        let body = lookup.upstream_body()?;
        info!(by_psira_number = lookup.uses_psira_number, "PSIRA lookup");

        let response = self
            .http
            .post(&self.api_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("PSIRA request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), details = %details, "PSIRA API error");
            return Ok(PsiraOutcome::Rejected {
                status: status.as_u16(),
                details,
            });
        }

        let data = response
            .json::<Value>()
            .await
            .map_err(|e| transport_error("PSIRA response was not valid JSON", e))?;
        Ok(PsiraOutcome::Found(data))
    }
}

fn transport_error(context: &str, e: reqwest::Error) -> AppError {
    error!(error = %e, "{context}");
    AppError::with_source(ErrorKind::ExternalService, e.to_string(), e)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api/SecurityOfficer/Get_ApplicantDetails")
    }

    fn client(api_url: String) -> PsiraClient {
        PsiraClient::new(&PsiraConfig {
            api_url,
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_body_selection() {
        let lookup = PsiraLookup {
            id_number: Some("9001015800087".into()),
            psira_number: Some("SIRA123".into()),
            uses_psira_number: true,
        };
        assert_eq!(lookup.upstream_body().unwrap(), json!({"psiraNumber": "SIRA123"}));

        let lookup = PsiraLookup {
            uses_psira_number: false,
            ..lookup
        };
        assert_eq!(
            lookup.upstream_body().unwrap(),
            json!({"idNumber": "9001015800087"})
        );
    }

    #[test]
    fn test_unselected_identifier_is_omitted() {
        let lookup = PsiraLookup {
            id_number: Some("9001015800087".into()),
            psira_number: None,
            uses_psira_number: true,
        };
        let body = lookup.upstream_body().unwrap();
        assert_eq!(body, json!({}));
        assert_eq!(body.to_string(), "{}");

        let lookup = PsiraLookup {
            id_number: Some(" ".into()),
            psira_number: Some("SIRA123".into()),
            uses_psira_number: false,
        };
        assert_eq!(lookup.upstream_body().unwrap(), json!({}));
    }

    #[test]
    fn test_requires_an_identifier() {
        let lookup = PsiraLookup {
            id_number: Some("  ".into()),
            ..Default::default()
        };
        let err = lookup.upstream_body().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Either idNumber or psiraNumber is required");
    }

    #[tokio::test]
    async fn test_lookup_echoes_upstream_json() {
        let url = spawn_upstream(Router::new().route(
            "/api/SecurityOfficer/Get_ApplicantDetails",
            post(|Json(body): Json<Value>| async move { Json(json!({"received": body})) }),
        ))
        .await;

        let outcome = client(url)
            .lookup(&PsiraLookup {
                id_number: Some("123".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            PsiraOutcome::Found(json!({"received": {"idNumber": "123"}}))
        );
    }

    #[tokio::test]
    async fn test_lookup_passes_through_failures() {
        let url = spawn_upstream(Router::new().route(
            "/api/SecurityOfficer/Get_ApplicantDetails",
            post(|| async { (StatusCode::NOT_FOUND, "no such officer") }),
        ))
        .await;

        let outcome = client(url)
            .lookup(&PsiraLookup {
                psira_number: Some("X".into()),
                uses_psira_number: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            PsiraOutcome::Rejected {
                status: 404,
                details: "no such officer".into()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let err = client("http://127.0.0.1:9/unreachable".into())
            .lookup(&PsiraLookup {
                id_number: Some("1".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
