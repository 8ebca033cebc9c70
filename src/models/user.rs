//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Internal user record, created on first sign-in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Internal user ID (UUID, also used as document ID)
    pub id: String,
    /// Identity-provider user ID (unique)
    pub external_id: String,
    /// Display name
    pub name: String,
    /// When the user was first synced (RFC3339 UTC)
    pub created_at: String,
}

impl User {
    /// New user with a fresh internal ID.
    pub fn new(external_id: &str, name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            external_id: external_id.to_string(),
            name: name.to_string(),
            created_at: crate::time_utils::now_rfc3339(),
        }
    }
}

/// Maps an external identity to the internal user.
///
/// Stored under the external ID so the mapping is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub external_id: String,
    pub user_id: String,
}
