//! Per-user bookmarks under `bookmark:<email>:<entityId>`.

use std::sync::Arc;

use crate::clock::ClockPort;
use crate::error::StoreError;
use crate::keys;
use crate::kv_store::{load_prefix, save_json, KeyValueStore};
use crate::models::{Bookmark, BookmarkType, Entity, User};

#[derive(Clone)]
pub struct BookmarkRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockPort>,
}

impl BookmarkRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// The user's bookmarks, newest first.
    pub async fn list_for_user(&self, email: &str) -> Result<Vec<Bookmark>, StoreError> {
        let mut bookmarks: Vec<Bookmark> =
            load_prefix(self.store.as_ref(), &keys::bookmark_user_prefix(email)).await?;
        bookmarks.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(bookmarks)
    }

    /// Saves a snapshot of `entity`. Saving the same venue again replaces the
    /// previous bookmark, refreshing its type, snapshot and timestamp.
    pub async fn add(
        &self,
        user: &User,
        entity: &Entity,
        bookmark_type: BookmarkType,
    ) -> Result<Bookmark, StoreError> {
        let bookmark = Bookmark {
            entity_id: entity.id.clone(),
            bookmark_type,
            entity: entity.clone(),
            timestamp: self.clock.now_millis(),
        };

        save_json(
            self.store.as_ref(),
            &keys::bookmark_key(&user.email, &entity.id),
            &bookmark,
        )
        .await?;
        Ok(bookmark)
    }

    pub async fn remove(&self, user: &User, entity_id: &str) -> Result<(), StoreError> {
        self.store
            .delete(&keys::bookmark_key(&user.email, entity_id))
            .await?;
        Ok(())
    }
}
