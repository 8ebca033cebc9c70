// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local runs and tests.
//!
//! Mirrors the Firestore layout: users keyed by ID, an identity index keyed
//! by external ID, and bookmarks keyed by (user, content).

use crate::error::AppError;
use crate::models::{Bookmark, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    users: DashMap<String, User>,
    identities: DashMap<String, String>,
    /// Value carries an insertion sequence to order equal timestamps.
    bookmarks: DashMap<String, (u64, Bookmark)>,
    seq: AtomicU64,
}

/// In-memory database handle. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.users.get(user_id).map(|u| u.clone()))
    }

    pub async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AppError> {
        let user_id = match self.inner.identities.get(external_id) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.get_user(&user_id).await
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.inner.identities.entry(user.external_id.clone()) {
            Entry::Occupied(_) => Err(AppError::Duplicate(format!(
                "identity {} already claimed",
                user.external_id
            ))),
            Entry::Vacant(slot) => {
                self.inner.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        self.inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    pub async fn insert_bookmark(&self, bookmark: &Bookmark) -> Result<(), AppError> {
        let key = Bookmark::key(&bookmark.user_id, &bookmark.content_id);
        match self.inner.bookmarks.entry(key) {
            Entry::Occupied(_) => Err(AppError::Duplicate(format!(
                "bookmark {} already exists",
                bookmark.content_id
            ))),
            Entry::Vacant(slot) => {
                let seq = self.inner.seq.fetch_add(1, Ordering::Relaxed);
                slot.insert((seq, bookmark.clone()));
                Ok(())
            }
        }
    }

    pub async fn get_bookmark(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> Result<Option<Bookmark>, AppError> {
        Ok(self
            .inner
            .bookmarks
            .get(&Bookmark::key(user_id, content_id))
            .map(|entry| entry.1.clone()))
    }

    pub async fn delete_bookmark(&self, user_id: &str, content_id: &str) -> Result<(), AppError> {
        self.inner
            .bookmarks
            .remove(&Bookmark::key(user_id, content_id));
        Ok(())
    }

    pub async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, AppError> {
        let mut rows: Vec<(u64, Bookmark)> = self
            .inner
            .bookmarks
            .iter()
            .filter(|entry| entry.1.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(rows.into_iter().map(|(_, b)| b).collect())
    }
}
