// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every error maps to an [`ErrorKind`], which decides whether the TourAPI
//! retry loop may try again and which user-facing message is shown.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Coarse error classification shared by the retry loop and the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    RateLimit,
    Server,
    Authentication,
    Validation,
    NotFound,
    Duplicate,
    NotSynced,
    Unknown,
}

impl ErrorKind {
    /// Stable machine-readable code used in JSON error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Server => "server",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::NotSynced => "not_synced",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Transient conditions worth another attempt.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::RateLimit | ErrorKind::Server
        )
    }

    /// Localized message shown to end users.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => "네트워크 연결을 확인해주세요.",
            ErrorKind::RateLimit => "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.",
            ErrorKind::Server => "서버에 일시적인 문제가 발생했습니다. 잠시 후 다시 시도해주세요.",
            ErrorKind::Authentication => "인증에 실패했습니다. 다시 로그인해주세요.",
            ErrorKind::Validation => "요청 값이 올바르지 않습니다.",
            ErrorKind::NotFound => "요청하신 정보를 찾을 수 없습니다.",
            ErrorKind::Duplicate => "이미 북마크에 추가된 관광지입니다.",
            ErrorKind::NotSynced => "계정 정보가 아직 동기화되지 않았습니다. 다시 로그인해주세요.",
            ErrorKind::Unknown => "알 수 없는 오류가 발생했습니다. 잠시 후 다시 시도해주세요.",
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Account not synced: {0}")]
    AccountNotSynced(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Already bookmarked: {0}")]
    Duplicate(String),

    #[error("TourAPI network error: {0}")]
    Network(String),

    #[error("TourAPI rate limit: {0}")]
    RateLimited(String),

    #[error("TourAPI server error: HTTP {status}")]
    Upstream { status: u16, body: String },

    #[error("TourAPI rejected credentials: {0}")]
    TourApiAuth(String),

    #[error("TourAPI request failed: HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("TourAPI data retrieval failed [{code}]: {message}")]
    TourApi { code: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized | AppError::InvalidToken | AppError::TourApiAuth(_) => {
                ErrorKind::Authentication
            }
            AppError::AccountNotSynced(_) => ErrorKind::NotSynced,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::BadRequest(_) => ErrorKind::Validation,
            AppError::Duplicate(_) => ErrorKind::Duplicate,
            AppError::Network(_) => ErrorKind::Network,
            AppError::RateLimited(_) => ErrorKind::RateLimit,
            AppError::Upstream { .. } => ErrorKind::Server,
            AppError::Http { .. }
            | AppError::TourApi { .. }
            | AppError::Database(_)
            | AppError::Internal(_) => ErrorKind::Unknown,
        }
    }

    /// Whether the caller may offer a manual retry.
    pub fn can_retry(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Localized message for presentation code.
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::TourApiAuth(_) | AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::AccountNotSynced(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Http { .. }
            | AppError::TourApi { .. }
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: &'static str,
    can_retry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = self.status();

        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            tracing::error!(error = %self, kind = kind.as_str(), "Request failed");
        } else {
            tracing::debug!(error = %self, kind = kind.as_str(), "Request rejected");
        }

        let body = ErrorResponse {
            error: kind.as_str(),
            message: kind.user_message(),
            can_retry: kind.is_retryable(),
            // Raw error text stays out of release builds.
            details: cfg!(debug_assertions).then(|| self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
