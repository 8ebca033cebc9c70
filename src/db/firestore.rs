// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (internal records, looked up through `user_identities`)
//! - Bookmarks (one document per user/content pair)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Bookmark, User, UserIdentity};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an offline client for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by internal ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve an external identity to its internal user.
    pub async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AppError> {
        let identity: Option<UserIdentity> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_IDENTITIES)
            .obj()
            .one(identity_doc_id(external_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match identity {
            Some(identity) => self.get_user(&identity.user_id).await,
            None => Ok(None),
        }
    }

    /// Create a user and claim its external identity.
    ///
    /// Returns `AppError::Duplicate` if the identity is already claimed; the
    /// user document written here is removed again in that case.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let client = self.get_client()?;

        let _: User = client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(map_write_error)?;

        let identity = UserIdentity {
            external_id: user.external_id.clone(),
            user_id: user.id.clone(),
        };

        let claimed: Result<UserIdentity, AppError> = client
            .fluent()
            .insert()
            .into(collections::USER_IDENTITIES)
            .document_id(identity_doc_id(&user.external_id))
            .object(&identity)
            .execute()
            .await
            .map_err(map_write_error);

        if let Err(e) = claimed {
            if let Err(cleanup) = client
                .fluent()
                .delete()
                .from(collections::USERS)
                .document_id(&user.id)
                .execute()
                .await
            {
                tracing::warn!(error = %cleanup, user_id = %user.id, "Failed to remove orphaned user");
            }
            return Err(e);
        }

        Ok(())
    }

    /// Overwrite an existing user document.
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Bookmark Operations ─────────────────────────────────────

    /// Insert a bookmark. Fails with `AppError::Duplicate` if the pair exists.
    pub async fn insert_bookmark(&self, bookmark: &Bookmark) -> Result<(), AppError> {
        let _: Bookmark = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::BOOKMARKS)
            .document_id(Bookmark::key(&bookmark.user_id, &bookmark.content_id))
            .object(bookmark)
            .execute()
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    /// Get the bookmark for a (user, content) pair.
    pub async fn get_bookmark(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> Result<Option<Bookmark>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::BOOKMARKS)
            .obj()
            .one(Bookmark::key(user_id, content_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the bookmark for a (user, content) pair. Missing is not an error.
    pub async fn delete_bookmark(&self, user_id: &str, content_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::BOOKMARKS)
            .document_id(Bookmark::key(user_id, content_id))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All bookmarks of a user, newest first.
    ///
    /// Requires a composite index on (user_id ASC, created_at DESC).
    pub async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::BOOKMARKS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Document ID for an identity mapping.
fn identity_doc_id(external_id: &str) -> String {
    urlencoding::encode(external_id).into_owned()
}

/// Map a create-only write failure, recognizing "document already exists".
fn map_write_error(err: firestore::errors::FirestoreError) -> AppError {
    if let firestore::errors::FirestoreError::DataConflictError(ref conflict) = err {
        return AppError::Duplicate(conflict.to_string());
    }

    let message = err.to_string();
    if is_already_exists_message(&message) {
        tracing::debug!(error = %message, "Conflict detected from error message");
        return AppError::Duplicate(message);
    }

    AppError::Database(message)
}

/// Fallback for errors that only carry the gRPC status as text.
pub(crate) fn is_already_exists_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("already_exists") || lower.contains("already exists")
}
