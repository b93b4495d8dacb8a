//! Rate limiting tests for the contact endpoint.
//!
//! The quota gates per identity: authenticated user id when a valid
//! bearer token is present, remote address otherwise.

mod common;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{header, HeaderValue, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use buzon::web::middleware::JwtClaims;
use common::{create_test_server, RecordingMailer, TEST_JWT_SECRET};

fn valid_payload() -> Value {
    json!({
        "name": "John",
        "apellido": "Doe",
        "email": "john@example.com",
        "phone": "312323232",
        "message": "Hello"
    })
}

/// Mint a bearer token the way the admin application would.
fn bearer(user_id: i64) -> HeaderValue {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = JwtClaims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

fn forwarded_for(ip: &'static str) -> HeaderValue {
    HeaderValue::from_static(ip)
}

#[tokio::test]
async fn test_second_request_is_rate_limited() {
    let mailer = Arc::new(RecordingMailer::default());
    let server = create_test_server(mailer.clone(), 1);

    server
        .post("/contact/")
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.post("/contact/").json(&valid_payload()).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // Only the first submission produced emails
    assert_eq!(mailer.sent_count(), 2);
}

#[tokio::test]
async fn test_rate_limit_rejects_before_validation() {
    let mailer = Arc::new(RecordingMailer::default());
    let server = create_test_server(mailer.clone(), 1);

    server
        .post("/contact/")
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    // The second request is invalid. A 400 here would mean the validator
    // saw it; the gate must answer with 429 first.
    let response = server.post("/contact/").json(&json!({})).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    assert_eq!(mailer.sent_count(), 2);
}

#[tokio::test]
async fn test_addresses_are_tracked_separately() {
    let mailer = Arc::new(RecordingMailer::default());
    let server = create_test_server(mailer.clone(), 1);

    server
        .post("/contact/")
        .add_header(header::HeaderName::from_static("x-forwarded-for"), forwarded_for("10.0.0.1"))
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    // A different address still has quota
    server
        .post("/contact/")
        .add_header(header::HeaderName::from_static("x-forwarded-for"), forwarded_for("10.0.0.2"))
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    // The first address is exhausted
    let response = server
        .post("/contact/")
        .add_header(header::HeaderName::from_static("x-forwarded-for"), forwarded_for("10.0.0.1"))
        .json(&valid_payload())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_authenticated_users_are_tracked_by_id() {
    let mailer = Arc::new(RecordingMailer::default());
    let server = create_test_server(mailer.clone(), 1);

    // Two users behind the same address each get their own quota
    server
        .post("/contact/")
        .add_header(header::HeaderName::from_static("x-forwarded-for"), forwarded_for("10.0.0.1"))
        .add_header(header::AUTHORIZATION, bearer(1))
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/contact/")
        .add_header(header::HeaderName::from_static("x-forwarded-for"), forwarded_for("10.0.0.1"))
        .add_header(header::AUTHORIZATION, bearer(2))
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    // The same user is throttled even from a different address
    let response = server
        .post("/contact/")
        .add_header(header::HeaderName::from_static("x-forwarded-for"), forwarded_for("10.0.0.9"))
        .add_header(header::AUTHORIZATION, bearer(1))
        .json(&valid_payload())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limited_body_is_json_error() {
    let mailer = Arc::new(RecordingMailer::default());
    let server = create_test_server(mailer, 1);

    server
        .post("/contact/")
        .json(&valid_payload())
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.post("/contact/").json(&valid_payload()).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let body: Value = response.json();
    assert!(body.get("error").is_some());
}
