// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in sync: creates the internal user for an external identity.

use crate::db::Database;
use crate::error::AppError;
use crate::models::User;

/// Maximum stored display-name length (characters).
const MAX_NAME_CHARS: usize = 100;

#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Return the user for `external_id`, creating it on first sign-in.
    ///
    /// A changed display name is written back. Concurrent first syncs for the
    /// same identity converge on one user.
    pub async fn sync(&self, external_id: &str, name: &str) -> Result<User, AppError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(AppError::Unauthorized);
        }
        let name: String = name.trim().chars().take(MAX_NAME_CHARS).collect();

        if let Some(mut existing) = self.db.find_user_by_external_id(external_id).await? {
            if !name.is_empty() && existing.name != name {
                existing.name = name;
                self.db.update_user(&existing).await?;
                tracing::info!(user_id = %existing.id, "User name updated");
            }
            return Ok(existing);
        }

        let user = User::new(external_id, &name);
        match self.db.create_user(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "User created from sign-in");
                Ok(user)
            }
            Err(AppError::Duplicate(_)) => {
                tracing::info!("Concurrent sign-in sync won, using existing user");
                self.db
                    .find_user_by_external_id(external_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Database("User identity claimed but user missing".to_string())
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Look up a user without creating one.
    pub async fn find(&self, external_id: &str) -> Result<Option<User>, AppError> {
        self.db.find_user_by_external_id(external_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;

    #[tokio::test]
    async fn test_sync_creates_once() {
        let service = UserService::new(MemoryDb::new().into());

        let first = service.sync("ext-1", "Kim").await.unwrap();
        let second = service.sync("ext-1", "Kim").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_sync_updates_name() {
        let service = UserService::new(MemoryDb::new().into());

        let created = service.sync("ext-1", "Kim").await.unwrap();
        let renamed = service.sync("ext-1", "Lee").await.unwrap();
        assert_eq!(created.id, renamed.id);
        assert_eq!(service.find("ext-1").await.unwrap().unwrap().name, "Lee");
    }

    #[tokio::test]
    async fn test_blank_identity_rejected() {
        let service = UserService::new(MemoryDb::new().into());
        assert!(matches!(
            service.sync("  ", "Kim").await,
            Err(AppError::Unauthorized)
        ));
    }
}
