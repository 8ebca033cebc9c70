//! Bookmark model for storage and API.

use serde::{Deserialize, Serialize};

/// A place bookmarked by a user. Unique per (user_id, content_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Bookmark ID (UUID)
    pub id: String,
    /// Owning internal user ID
    pub user_id: String,
    /// TourAPI content ID (not validated against TourAPI)
    pub content_id: String,
    /// Creation time (RFC3339 UTC, fixed width so it sorts lexically)
    pub created_at: String,
}

impl Bookmark {
    pub fn new(user_id: &str, content_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content_id: content_id.to_string(),
            created_at: crate::time_utils::now_rfc3339(),
        }
    }

    /// Storage key for the (user, content) pair.
    ///
    /// Content IDs are opaque, so they are percent-encoded to stay valid as
    /// a document ID.
    pub fn key(user_id: &str, content_id: &str) -> String {
        format!("{}_{}", user_id, urlencoding::encode(content_id))
    }
}
