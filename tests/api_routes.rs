//! API routing tests against a stub checker.
//!
//! **What We're Testing:**
//! 1. Request validation (empty subjects, malformed bodies)
//! 2. Query options reach the checker as the documented parameters
//! 3. Converter, `/info` and `/` responses

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use funceble_worker::checker::{
    Availability, AvailabilityParams, AvailabilityStatus, Checker, Reputation, ReputationParams,
    ReputationStatus, SubjectKind, SyntaxFlags, SyntaxStatus, Validity,
};
use funceble_worker::config::{Sources, DOCUMENTATION_URL};
use funceble_worker::datasets::DatasetStore;
use funceble_worker::error_handling::CheckerError;
use funceble_worker::location::{LocationRecord, LocationSlot};
use funceble_worker::server::{router, AppState, WhoisPolicy};

/// Checker that answers every subject and echoes the parameters it received.
struct EchoChecker;

impl Checker for EchoChecker {
    fn version(&self) -> &str {
        "echo-1.0"
    }

    fn availability(
        &self,
        _kind: SubjectKind,
        subject: &str,
        params: &AvailabilityParams,
    ) -> Result<AvailabilityStatus, CheckerError> {
        Ok(AvailabilityStatus {
            subject: subject.to_string(),
            idna_subject: subject.to_string(),
            status: Availability::Active,
            status_source: "DNSLOOKUP".to_string(),
            tested_at: Utc::now(),
            syntax: SyntaxFlags::default(),
            expiration_date: None,
            status_before_extra_rules: None,
            status_after_extra_rules: None,
            status_source_before_extra_rules: None,
            status_source_after_extra_rules: None,
            dns_lookup: None,
            netinfo: None,
            http_status_code: None,
            params: params.clone(),
        })
    }

    fn reputation(
        &self,
        kind: SubjectKind,
        subject: &str,
        params: &ReputationParams,
    ) -> Result<ReputationStatus, CheckerError> {
        Ok(ReputationStatus {
            subject: subject.to_string(),
            idna_subject: subject.to_string(),
            status: Reputation::Sane,
            status_source: "REPUTATION".to_string(),
            tested_at: Utc::now(),
            syntax: SyntaxFlags::default(),
            dns_lookup: None,
            params: params.clone(),
            checker_type: kind.to_string(),
        })
    }

    fn syntax(&self, kind: SubjectKind, subject: &str) -> Result<SyntaxStatus, CheckerError> {
        Ok(SyntaxStatus {
            subject: subject.to_string(),
            idna_subject: subject.to_string(),
            status: Validity::Valid,
            status_source: "SYNTAX".to_string(),
            tested_at: Utc::now(),
            syntax: SyntaxFlags {
                domain_syntax: Some(true),
                ..Default::default()
            },
            checker_type: kind.to_string(),
        })
    }
}

fn app(dir: &TempDir, whois: WhoisPolicy) -> Router {
    let location = Arc::new(LocationSlot::new());
    location.replace(LocationRecord {
        country_code: Some("CH".to_string()),
        ..Default::default()
    });

    let state = AppState {
        checker: Arc::new(EchoChecker),
        datasets: Arc::new(DatasetStore::new(
            dir.path(),
            Sources::default(),
            reqwest::Client::new(),
        )),
        location,
        instance_id: Arc::from("0123456789abcdef"),
        whois,
    };
    router(state, &[])
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_blank_subject_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(&dir, WhoisPolicy::default()),
        post_json("/availability/domain", serde_json::json!({"subject": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("subject"));
}

#[tokio::test]
async fn test_missing_subject_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    let (status, _) = send(
        app(&dir, WhoisPolicy::default()),
        post_json("/syntax/domain", serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_syntax_check_returns_status() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(&dir, WhoisPolicy::default()),
        post_json("/syntax/domain", serde_json::json!({"subject": "example.org"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "example.org");
    assert_eq!(body["status"], "VALID");
    assert_eq!(body["checker_type"], "DOMAIN");
    assert_eq!(body["domain_syntax"], true);
}

#[tokio::test]
async fn test_reputation_query_reaches_checker() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(&dir, WhoisPolicy::default()),
        post_json(
            "/reputation/domain-and-ip?do_syntax_check_first=false",
            serde_json::json!({"subject": "192.0.2.1"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["do_syntax_check_first"], false);
    assert_eq!(body["checker_type"], "DOMAIN_AND_IP");
}

#[tokio::test]
async fn test_url_availability_forces_lookups() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(&dir, WhoisPolicy::default()),
        post_json(
            "/availability/url?use_dns_lookup=true&use_extra_rules=true",
            serde_json::json!({"subject": "https://example.org/"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let params = &body["params"];
    assert_eq!(params["use_extra_rules"], false);
    assert_eq!(params["use_dns_lookup"], false);
    assert_eq!(params["use_netinfo_lookup"], false);
    assert_eq!(params["use_http_code_lookup"], true);
    assert_eq!(params["use_whois_db"], false);
}

#[tokio::test]
async fn test_whois_param_follows_policy() {
    let dir = TempDir::new().unwrap();
    let request = || {
        post_json(
            "/availability/domain?use_whois_lookup=true",
            serde_json::json!({"subject": "example.org"}),
        )
    };

    let locked = WhoisPolicy {
        allow_lookup: false,
        allow_param: false,
    };
    let (_, body) = send(app(&dir, locked), request()).await;
    assert_eq!(body["params"]["use_whois_lookup"], false);

    let open = WhoisPolicy {
        allow_lookup: false,
        allow_param: true,
    };
    let (_, body) = send(app(&dir, open), request()).await;
    assert_eq!(body["params"]["use_whois_lookup"], true);
}

#[tokio::test]
async fn test_cidr_converter() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(&dir, WhoisPolicy::default()),
        post_json(
            "/tools/converter/cidr",
            serde_json::json!({"data": " 192.0.2.0/30 "}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(["192.0.2.1", "192.0.2.2"]));
}

#[tokio::test]
async fn test_wildcard_converter_returns_string() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        app(&dir, WhoisPolicy::default()),
        post_json(
            "/tools/converter/wildcard",
            serde_json::json!({"data": "*.*.example.org"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "example.org");
}

#[tokio::test]
async fn test_info_reports_instance() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(app(&dir, WhoisPolicy::default()), get("/info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "0123456789abcdef");
    assert_eq!(body["version"]["checker"], "echo-1.0");
    assert_eq!(body["version"]["worker"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["location"]["country_code"], "CH");
    assert!(body["location"]["city"].is_null());
}

#[tokio::test]
async fn test_root_links() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(app(&dir, WhoisPolicy::default()), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documentation"]["pyfunceble"], DOCUMENTATION_URL);
    assert!(body["projects"]["pyfunceble_github"]
        .as_str()
        .unwrap()
        .starts_with("https://github.com/"));
    assert!(body["support"]["kofi"].is_string());
}
