// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-attempt instrumentation for TourAPI calls.
//!
//! The client is handed an observer at construction and reports every
//! attempt to it; nothing global is patched.

use crate::error::ErrorKind;
use crate::services::query::Endpoint;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One completed HTTP attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchEvent {
    pub endpoint: Endpoint,
    /// 1-based attempt number
    pub attempt: u32,
    pub elapsed: Duration,
    pub outcome: Result<(), ErrorKind>,
}

/// Receives fetch events. Must be cheap; it runs inline with the request.
pub trait FetchObserver: Send + Sync {
    fn on_attempt(&self, event: &FetchEvent);
}

/// Default observer: structured log line per attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_attempt(&self, event: &FetchEvent) {
        let elapsed_ms = event.elapsed.as_millis() as u64;
        match event.outcome {
            Ok(()) => tracing::debug!(
                endpoint = event.endpoint.path(),
                attempt = event.attempt,
                elapsed_ms,
                "TourAPI call succeeded"
            ),
            Err(kind) => tracing::warn!(
                endpoint = event.endpoint.path(),
                attempt = event.attempt,
                elapsed_ms,
                kind = kind.as_str(),
                "TourAPI call failed"
            ),
        }
    }
}

/// Observer that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<FetchEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Attempts recorded for one endpoint.
    pub fn attempts(&self, endpoint: Endpoint) -> usize {
        self.events()
            .iter()
            .filter(|e| e.endpoint == endpoint)
            .count()
    }
}

impl FetchObserver for RecordingObserver {
    fn on_attempt(&self, event: &FetchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
