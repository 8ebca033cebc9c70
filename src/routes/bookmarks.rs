// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Bookmark;
use crate::services::bookmarks::BatchRemoval;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Bookmark routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/api/bookmarks/delete", post(remove_bookmarks))
        .route(
            "/api/bookmarks/{content_id}",
            get(get_bookmark_status).delete(remove_bookmark),
        )
        .route("/api/bookmarks/{content_id}/toggle", put(toggle_bookmark))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BookmarkResponse {
    pub id: String,
    pub content_id: String,
    pub created_at: String,
}

impl From<Bookmark> for BookmarkResponse {
    fn from(bookmark: Bookmark) -> Self {
        Self {
            id: bookmark.id,
            content_id: bookmark.content_id,
            created_at: bookmark.created_at,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<BookmarkResponse>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BookmarkStatus {
    pub content_id: String,
    pub bookmarked: bool,
}

#[derive(Deserialize, Validate)]
pub struct AddBookmarkRequest {
    #[validate(length(min = 1, max = 64))]
    content_id: String,
}

#[derive(Deserialize, Validate)]
pub struct RemoveBookmarksRequest {
    #[validate(length(min = 1, max = 100))]
    content_ids: Vec<String>,
}

/// List the caller's bookmarks, newest first.
async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BookmarksResponse>> {
    let bookmarks = state.bookmarks.list(&user.external_id).await?;
    Ok(Json(BookmarksResponse {
        bookmarks: bookmarks.into_iter().map(Into::into).collect(),
    }))
}

/// Bookmark a place. 409 if it is already bookmarked.
async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddBookmarkRequest>,
) -> Result<(StatusCode, Json<BookmarkResponse>)> {
    body.validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let bookmark = state
        .bookmarks
        .add(&user.external_id, &body.content_id)
        .await?;
    Ok((StatusCode::CREATED, Json(bookmark.into())))
}

async fn get_bookmark_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> Result<Json<BookmarkStatus>> {
    let bookmarked = state
        .bookmarks
        .is_bookmarked(&user.external_id, &content_id)
        .await?;
    Ok(Json(BookmarkStatus {
        content_id,
        bookmarked,
    }))
}

async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> Result<Json<BookmarkStatus>> {
    let bookmarked = state
        .bookmarks
        .toggle(&user.external_id, &content_id)
        .await?;
    Ok(Json(BookmarkStatus {
        content_id,
        bookmarked,
    }))
}

/// Remove a bookmark. 204 whether or not it existed.
async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> Result<StatusCode> {
    state
        .bookmarks
        .remove(&user.external_id, &content_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove several bookmarks; reports per-item failures.
async fn remove_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<RemoveBookmarksRequest>,
) -> Result<Json<BatchRemoval>> {
    body.validate()
        .map_err(|e| crate::error::AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .bookmarks
        .remove_many(&user.external_id, &body.content_ids)
        .await?;
    Ok(Json(outcome))
}
