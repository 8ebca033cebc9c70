// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! tourmark API server
//!
//! Serves Korean tourist attraction data from TourAPI and stores
//! per-user bookmarks.

use std::sync::Arc;
use tourmark::{
    config::{Config, StorageBackend},
    db::{Database, FirestoreDb, MemoryDb},
    services::{PlaceService, TourApiClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        tour_api = %config.tour_api_base_url,
        max_attempts = config.max_attempts,
        "Starting tourmark API"
    );

    let db: Database = match config.storage {
        StorageBackend::Firestore => FirestoreDb::new(&config.gcp_project_id).await?.into(),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; bookmarks are lost on restart");
            MemoryDb::new().into()
        }
    };

    let places = PlaceService::new(TourApiClient::new(&config)?);

    let state = Arc::new(AppState::new(config.clone(), db, places));
    let app = tourmark::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tourmark=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
