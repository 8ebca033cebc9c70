// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded retry with exponential backoff for TourAPI calls.
//!
//! Network, 5xx and rate-limit failures are retried; authentication and
//! validation failures are returned on the spot. There is no overall
//! deadline: the attempt cap bounds the worst case.

use crate::error::AppError;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Cap for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (1-based): `min(base * 2^(n-2), max)`.
    ///
    /// The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails terminally, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. On exhaustion the last
    /// error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.can_retry() && attempt < max_attempts => {
                    let delay = self.delay_before(attempt + 1);
                    tracing::info!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying TourAPI request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.can_retry() {
                        tracing::warn!(attempt, error = %err, "TourAPI retries exhausted");
                    }
                    return Err(err);
                }
            }
        }
    }
}

/// Map a non-success HTTP status to an error. `None` for 2xx.
pub fn classify_status(status: StatusCode, body: &str) -> Option<AppError> {
    if status.is_success() {
        return None;
    }

    let body = body.chars().take(500).collect::<String>();
    let err = match status.as_u16() {
        401 | 403 => AppError::TourApiAuth(format!("HTTP {}", status)),
        429 => AppError::RateLimited(format!("HTTP {}", status)),
        s if s >= 500 => AppError::Upstream { status: s, body },
        404 => AppError::NotFound(format!("TourAPI resource (HTTP 404): {}", body)),
        400 => AppError::BadRequest(format!("TourAPI rejected request: {}", body)),
        s => AppError::Http { status: s, body },
    };
    Some(err)
}

/// Transport-level failures are all retryable network errors.
pub fn classify_transport(err: &reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Network(format!("timed out: {}", err))
    } else {
        AppError::Network(err.to_string())
    }
}
