//! Database layer (Firestore, or in-memory for local runs and tests).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Bookmark, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// External identity -> internal user ID (keyed by external ID)
    pub const USER_IDENTITIES: &str = "user_identities";
    /// Keyed by `{user_id}_{content_id}`
    pub const BOOKMARKS: &str = "bookmarks";
}

/// Storage handle used by the services.
///
/// Both backends enforce the same uniqueness rules: one user per external
/// identity and one bookmark per (user, content) pair, reported as
/// `AppError::Duplicate`.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    pub async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AppError> {
        match self {
            Database::Firestore(db) => db.find_user_by_external_id(external_id).await,
            Database::Memory(db) => db.find_user_by_external_id(external_id).await,
        }
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Database::Firestore(db) => db.create_user(user).await,
            Database::Memory(db) => db.create_user(user).await,
        }
    }

    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Database::Firestore(db) => db.update_user(user).await,
            Database::Memory(db) => db.update_user(user).await,
        }
    }

    pub async fn insert_bookmark(&self, bookmark: &Bookmark) -> Result<(), AppError> {
        match self {
            Database::Firestore(db) => db.insert_bookmark(bookmark).await,
            Database::Memory(db) => db.insert_bookmark(bookmark).await,
        }
    }

    pub async fn get_bookmark(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> Result<Option<Bookmark>, AppError> {
        match self {
            Database::Firestore(db) => db.get_bookmark(user_id, content_id).await,
            Database::Memory(db) => db.get_bookmark(user_id, content_id).await,
        }
    }

    pub async fn delete_bookmark(&self, user_id: &str, content_id: &str) -> Result<(), AppError> {
        match self {
            Database::Firestore(db) => db.delete_bookmark(user_id, content_id).await,
            Database::Memory(db) => db.delete_bookmark(user_id, content_id).await,
        }
    }

    pub async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, AppError> {
        match self {
            Database::Firestore(db) => db.list_bookmarks(user_id).await,
            Database::Memory(db) => db.list_bookmarks(user_id).await,
        }
    }
}

impl From<FirestoreDb> for Database {
    fn from(db: FirestoreDb) -> Self {
        Database::Firestore(db)
    }
}

impl From<MemoryDb> for Database {
    fn from(db: MemoryDb) -> Self {
        Database::Memory(db)
    }
}
