// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TourAPI (한국관광공사 국문 관광정보 서비스) HTTP client.
//!
//! Handles:
//! - URL construction with service key and default parameters
//! - Bounded retry with backoff on network, 5xx and rate-limit failures
//! - Result envelope validation
//! - Per-attempt instrumentation through a [`FetchObserver`]

use crate::config::Config;
use crate::error::AppError;
use crate::services::envelope::{self, opt_string, ResponseBody};
use crate::services::observer::{FetchEvent, FetchObserver, TracingObserver};
use crate::services::query::{Endpoint, Params, RequestBuilder};
use crate::services::retry::{classify_status, classify_transport, RetryPolicy};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// TourAPI client.
#[derive(Clone)]
pub struct TourApiClient {
    http: reqwest::Client,
    requests: RequestBuilder,
    retry: RetryPolicy,
    observer: Arc<dyn FetchObserver>,
}

impl TourApiClient {
    /// Create a client from configuration, logging attempts via `tracing`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// Create a client that reports attempts to `observer`.
    pub fn with_observer(
        config: &Config,
        observer: Arc<dyn FetchObserver>,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            requests: RequestBuilder::new(
                &config.tour_api_base_url,
                &config.tour_api_key,
                &config.mobile_os,
                &config.mobile_app,
            ),
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: config.retry_base_delay,
                max_delay: config.retry_max_delay,
            },
            observer,
        })
    }

    /// GET an endpoint with retry and return the validated body.
    pub async fn fetch(&self, endpoint: Endpoint, params: &Params) -> Result<ResponseBody, AppError> {
        let url = self.requests.url(endpoint, params);

        self.retry
            .run(|attempt| {
                let url = url.clone();
                async move {
                    let started = Instant::now();
                    let result = self.fetch_once(&url).await;
                    self.observer.on_attempt(&FetchEvent {
                        endpoint,
                        attempt,
                        elapsed: started.elapsed(),
                        outcome: result.as_ref().map(|_| ()).map_err(|e| e.kind()),
                    });
                    result
                }
            })
            .await
    }

    /// Fetch and decode all result items of an endpoint.
    pub async fn fetch_items<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: Endpoint,
        params: &Params,
    ) -> Result<(Vec<T>, PageInfo), AppError> {
        let body = self.fetch(endpoint, params).await?;
        let info = PageInfo {
            page_no: body.page_no,
            num_of_rows: body.num_of_rows,
            total_count: body.total_count,
        };
        Ok((body.into_items()?, info))
    }

    /// One HTTP attempt: send, check status, validate envelope.
    async fn fetch_once(&self, url: &str) -> Result<ResponseBody, AppError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        // A terminal status stays terminal even if its body is cut short.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Err(match classify_status(status, "") {
                    Some(err) if !err.can_retry() => err,
                    _ => classify_transport(&e),
                })
            }
        };

        if let Some(err) = classify_status(status, &body) {
            return Err(err);
        }

        envelope::validate(&body)
    }
}

/// Paging metadata from a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page_no: u32,
    pub num_of_rows: u32,
    pub total_count: u32,
}

// ─── Raw item shapes ─────────────────────────────────────────────────────────

/// Area code item (`areaCode1`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawAreaCode {
    #[serde(default, deserialize_with = "opt_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub name: Option<String>,
}

/// Place item shared by list, search and common-detail responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlace {
    #[serde(default, deserialize_with = "opt_string")]
    pub contentid: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub contenttypeid: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub addr1: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub addr2: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub mapx: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub mapy: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cat1: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cat2: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub cat3: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub areacode: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub sigungucode: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub tel: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub firstimage: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub firstimage2: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub modifiedtime: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub zipcode: Option<String>,
}

/// Image item (`detailImage1`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    #[serde(default, deserialize_with = "opt_string")]
    pub contentid: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub originimgurl: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub smallimageurl: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub serialnum: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub imgname: Option<String>,
}

/// Intro item (`detailIntro1`): keys vary by content type.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawIntro(pub serde_json::Map<String, Value>);

impl RawIntro {
    /// Flatten to string values, dropping nulls and blanks.
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.0
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                (!text.trim().is_empty()).then_some((key, text))
            })
            .collect()
    }
}
