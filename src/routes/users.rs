// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User routes: sign-in sync and profile.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/sync", post(sync_user))
        .route("/api/me", get(get_me))
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    name: Option<String>,
}

/// Create the internal user on sign-in (idempotent).
async fn sync_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SyncRequest>,
) -> Result<Json<UserResponse>> {
    let name = body.name.unwrap_or_default();

    let synced = state.users.sync(&user.external_id, &name).await?;
    Ok(Json(synced.into()))
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .users
        .find(&user.external_id)
        .await?
        .ok_or_else(|| AppError::AccountNotSynced(user.external_id.clone()))?;

    Ok(Json(profile.into()))
}
