// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! tourmark: browse Korean tourist attractions and keep bookmarks.
//!
//! This crate provides the backend API that serves place data from the
//! Korea Tourism Organization TourAPI and stores user bookmarks.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{BookmarkGateway, PlaceService, UserService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub places: PlaceService,
    pub bookmarks: BookmarkGateway,
    pub users: UserService,
}

impl AppState {
    /// Wire services over a database and TourAPI client.
    pub fn new(config: Config, db: Database, places: PlaceService) -> Self {
        Self {
            bookmarks: BookmarkGateway::new(db.clone()),
            users: UserService::new(db),
            config,
            places,
        }
    }
}
