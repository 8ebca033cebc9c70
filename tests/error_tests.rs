// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use tourmark::error::{AppError, ErrorKind};

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_kind_codes_are_stable() {
    let kinds = [
        (ErrorKind::Network, "network"),
        (ErrorKind::RateLimit, "rate_limit"),
        (ErrorKind::Server, "server"),
        (ErrorKind::Authentication, "authentication"),
        (ErrorKind::Validation, "validation"),
        (ErrorKind::NotFound, "not_found"),
        (ErrorKind::Duplicate, "duplicate"),
        (ErrorKind::NotSynced, "not_synced"),
        (ErrorKind::Unknown, "unknown"),
    ];
    for (kind, code) in kinds {
        assert_eq!(kind.as_str(), code);
        assert!(!kind.user_message().is_empty());
    }
}

#[test]
fn test_only_transient_kinds_retry() {
    let retryable: Vec<ErrorKind> = [
        ErrorKind::Network,
        ErrorKind::RateLimit,
        ErrorKind::Server,
        ErrorKind::Authentication,
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Duplicate,
        ErrorKind::NotSynced,
        ErrorKind::Unknown,
    ]
    .into_iter()
    .filter(|k| k.is_retryable())
    .collect();

    assert_eq!(
        retryable,
        vec![ErrorKind::Network, ErrorKind::RateLimit, ErrorKind::Server]
    );
}

#[tokio::test]
async fn test_duplicate_response() {
    let (status, body) = render(AppError::Duplicate("126508".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate");
    assert_eq!(body["can_retry"], false);
}

#[tokio::test]
async fn test_network_response_is_retryable() {
    let (status, body) = render(AppError::Network("connection reset".into())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "network");
    assert_eq!(body["can_retry"], true);
    assert_eq!(body["message"], "네트워크 연결을 확인해주세요.");
}

#[tokio::test]
async fn test_session_and_upstream_auth_differ() {
    let (session, _) = render(AppError::Unauthorized).await;
    let (upstream, body) = render(AppError::TourApiAuth("key".into())).await;

    assert_eq!(session, StatusCode::UNAUTHORIZED);
    assert_eq!(upstream, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "authentication");
}

#[tokio::test]
async fn test_unknown_provider_code() {
    let (status, body) = render(AppError::TourApi {
        code: "99".into(),
        message: "UNKNOWN_ERROR".into(),
    })
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "unknown");
}
