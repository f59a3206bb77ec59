// Test file - these are expected patterns in test code
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Tests for bearer-token extraction and the auth middleware wiring

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::AUTHORIZATION;

use super::middleware::extract_bearer_token;

fn request_with_auth(value: Option<&str>) -> Request {
    let mut builder = Request::builder().uri("/users/profile");
    if let Some(v) = value {
        builder = builder.header(AUTHORIZATION, v);
    }
    builder.body(Body::empty()).unwrap()
}

#[test]
fn extracts_bearer_token() {
    let request = request_with_auth(Some("Bearer abc.def.ghi"));
    assert_eq!(extract_bearer_token(&request).as_deref(), Some("abc.def.ghi"));
}

#[test]
fn missing_header_yields_none() {
    let request = request_with_auth(None);
    assert!(extract_bearer_token(&request).is_none());
}

#[test]
fn non_bearer_scheme_yields_none() {
    let request = request_with_auth(Some("Basic dXNlcjpwYXNz"));
    assert!(extract_bearer_token(&request).is_none());
}

#[test]
fn bearer_prefix_is_case_sensitive() {
    let request = request_with_auth(Some("bearer abc"));
    assert!(extract_bearer_token(&request).is_none());
}
