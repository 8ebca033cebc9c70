// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark operations for signed-in users.
//!
//! Callers identify users by their identity-provider ID. The gateway
//! resolves that to the internal user but never creates one; see
//! [`crate::services::UserService::sync`].

use crate::db::Database;
use crate::error::AppError;
use crate::models::{Bookmark, User};
use futures_util::future::join_all;
use serde::Serialize;

/// Maximum content IDs accepted by one batch removal.
pub const MAX_BATCH_SIZE: usize = 100;

/// Outcome of a batch removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchRemoval {
    pub removed: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub content_id: String,
    pub error: String,
}

/// Bookmark gateway over the configured store.
#[derive(Clone)]
pub struct BookmarkGateway {
    db: Database,
}

impl BookmarkGateway {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Internal user for an external identity.
    ///
    /// Fails with `AccountNotSynced` when sign-in sync has not run yet.
    pub async fn resolve_user(&self, external_id: &str) -> Result<User, AppError> {
        self.db
            .find_user_by_external_id(external_id)
            .await?
            .ok_or_else(|| AppError::AccountNotSynced(external_id.to_string()))
    }

    /// Bookmark a place. An existing bookmark yields `AppError::Duplicate`.
    pub async fn add(&self, external_id: &str, content_id: &str) -> Result<Bookmark, AppError> {
        let content_id = require_content_id(content_id)?;
        let user = self.resolve_user(external_id).await?;

        let bookmark = Bookmark::new(&user.id, content_id);
        self.db.insert_bookmark(&bookmark).await?;

        tracing::info!(user_id = %user.id, content_id, "Bookmark added");
        Ok(bookmark)
    }

    /// Remove a bookmark. Removing a missing bookmark succeeds.
    pub async fn remove(&self, external_id: &str, content_id: &str) -> Result<(), AppError> {
        let content_id = require_content_id(content_id)?;
        let user = self.resolve_user(external_id).await?;

        self.db.delete_bookmark(&user.id, content_id).await?;

        tracing::info!(user_id = %user.id, content_id, "Bookmark removed");
        Ok(())
    }

    /// Remove several bookmarks concurrently.
    ///
    /// Individual failures are reported in the result and do not stop the
    /// other deletions.
    pub async fn remove_many(
        &self,
        external_id: &str,
        content_ids: &[String],
    ) -> Result<BatchRemoval, AppError> {
        if content_ids.len() > MAX_BATCH_SIZE {
            return Err(AppError::BadRequest(format!(
                "At most {} bookmarks can be removed at once",
                MAX_BATCH_SIZE
            )));
        }

        let user = self.resolve_user(external_id).await?;

        let results = join_all(content_ids.iter().map(|content_id| {
            let user_id = user.id.as_str();
            async move {
                let outcome = match require_content_id(content_id) {
                    Ok(id) => self.db.delete_bookmark(user_id, id).await,
                    Err(e) => Err(e),
                };
                (content_id.clone(), outcome)
            }
        }))
        .await;

        let mut batch = BatchRemoval::default();
        for (content_id, outcome) in results {
            match outcome {
                Ok(()) => batch.removed.push(content_id),
                Err(e) => {
                    tracing::warn!(user_id = %user.id, content_id = %content_id, error = %e, "Batch bookmark removal failed");
                    batch.failed.push(BatchFailure {
                        content_id,
                        error: e.kind().as_str().to_string(),
                    });
                }
            }
        }

        Ok(batch)
    }

    /// All bookmarks of a user, newest first. Empty if none.
    pub async fn list(&self, external_id: &str) -> Result<Vec<Bookmark>, AppError> {
        let user = self.resolve_user(external_id).await?;
        self.db.list_bookmarks(&user.id).await
    }

    /// Whether a place is bookmarked.
    pub async fn is_bookmarked(&self, external_id: &str, content_id: &str) -> Result<bool, AppError> {
        let content_id = require_content_id(content_id)?;
        let user = self.resolve_user(external_id).await?;
        Ok(self.db.get_bookmark(&user.id, content_id).await?.is_some())
    }

    /// Flip the bookmark state and return the new state.
    pub async fn toggle(&self, external_id: &str, content_id: &str) -> Result<bool, AppError> {
        if self.is_bookmarked(external_id, content_id).await? {
            self.remove(external_id, content_id).await?;
            return Ok(false);
        }

        match self.add(external_id, content_id).await {
            Ok(_) => Ok(true),
            // Added concurrently; the intent is satisfied.
            Err(AppError::Duplicate(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }
}

fn require_content_id(content_id: &str) -> Result<&str, AppError> {
    let trimmed = content_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("content_id is required".to_string()));
    }
    Ok(trimmed)
}
