// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod bookmarks;
pub mod envelope;
pub mod observer;
pub mod places;
pub mod query;
pub mod retry;
pub mod tour_api;
pub mod users;

pub use bookmarks::BookmarkGateway;
pub use observer::{FetchEvent, FetchObserver, RecordingObserver, TracingObserver};
pub use places::{PlaceFilter, PlaceOverview, PlaceService};
pub use retry::RetryPolicy;
pub use tour_api::TourApiClient;
pub use users::UserService;
