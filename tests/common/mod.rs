// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::{header, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tourmark::config::Config;
use tourmark::db::{Database, FirestoreDb, MemoryDb};
use tourmark::routes::create_router;
use tourmark::services::{FetchObserver, PlaceService, TourApiClient};
use tourmark::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique suffix for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

/// Test config pointing the TourAPI client at `base_url`.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    Config {
        tour_api_base_url: base_url.to_string(),
        ..Config::test_default()
    }
}

/// TourAPI client for `base_url` reporting to `observer`.
#[allow(dead_code)]
pub fn test_client(base_url: &str, observer: Arc<dyn FetchObserver>) -> TourApiClient {
    TourApiClient::with_observer(&test_config(base_url), observer)
        .expect("Failed to build TourAPI client")
}

/// Create a test app backed by in-memory storage.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(base_url: &str) -> (Router, Arc<AppState>) {
    let config = test_config(base_url);
    let db: Database = MemoryDb::new().into();
    let places =
        PlaceService::new(TourApiClient::new(&config).expect("Failed to build TourAPI client"));

    let state = Arc::new(AppState::new(config, db, places));
    (create_router(state.clone()), state)
}

/// Session token for `external_id` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(external_id: &str) -> String {
    tourmark::middleware::auth::create_jwt(
        external_id,
        &Config::test_default().jwt_signing_key,
    )
    .expect("Failed to create JWT")
}

/// Requests received by a fake TourAPI server.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<Uri>>>);

#[allow(dead_code)]
impl RequestLog {
    /// Record a request; returns how many requests `uri.path()` has seen.
    fn record(&self, uri: &Uri) -> usize {
        let mut requests = self.0.lock().unwrap();
        requests.push(uri.clone());
        requests.iter().filter(|u| u.path() == uri.path()).count()
    }

    /// Number of requests for an endpoint, e.g. `"searchKeyword1"`.
    pub fn count(&self, endpoint: &str) -> usize {
        self.queries(endpoint).len()
    }

    /// Raw query strings received for an endpoint, in arrival order.
    pub fn queries(&self, endpoint: &str) -> Vec<String> {
        let path = format!("/{}", endpoint);
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.path() == path)
            .map(|u| u.query().unwrap_or_default().to_string())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Start a fake TourAPI on a random local port.
///
/// `responder` gets the endpoint name (without the leading slash) and the
/// 1-based hit number for that endpoint, and returns status and body.
#[allow(dead_code)]
pub async fn fake_tour_api<F>(responder: F) -> (String, RequestLog)
where
    F: Fn(&str, usize) -> (StatusCode, String) + Send + Sync + 'static,
{
    let log = RequestLog::default();
    let handler_log = log.clone();
    let responder = Arc::new(responder);

    let app = Router::new().fallback(move |uri: Uri| {
        let log = handler_log.clone();
        let responder = responder.clone();
        async move {
            let hit = log.record(&uri);
            let (status, body) = responder(uri.path().trim_start_matches('/'), hit);
            (status, [(header::CONTENT_TYPE, "application/json")], body)
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake TourAPI");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), log)
}

/// Base URL of a local port with nothing listening.
#[allow(dead_code)]
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Successful TourAPI envelope wrapping `items` (the value of `body.items`).
#[allow(dead_code)]
pub fn ok_envelope(items: Value, total_count: u32) -> String {
    json!({
        "response": {
            "header": {"resultCode": "0000", "resultMsg": "OK"},
            "body": {
                "items": items,
                "numOfRows": 10,
                "pageNo": 1,
                "totalCount": total_count
            }
        }
    })
    .to_string()
}

/// Envelope carrying a provider error code.
#[allow(dead_code)]
pub fn error_envelope(code: &str, message: &str) -> String {
    json!({
        "response": {
            "header": {"resultCode": code, "resultMsg": message}
        }
    })
    .to_string()
}

/// A list-style place item.
#[allow(dead_code)]
pub fn place_item(content_id: &str, title: &str) -> Value {
    json!({
        "contentid": content_id,
        "contenttypeid": "12",
        "title": title,
        "addr1": "서울특별시 종로구 사직로 161",
        "areacode": "1",
        "mapx": "1269769930",
        "mapy": "375760000",
        "firstimage": ""
    })
}
