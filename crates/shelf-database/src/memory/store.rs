//! Store trait implementations over a shared [`MemoryState`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use shelf_core::result::AppResult;
use shelf_entity::{
    Collection, Comic, ComicFilter, NewComic, ParentFilter, ReadState, ReadTally, ReadingStats,
    ReadingWindows,
};

use super::state::MemoryState;
use crate::store::{CollectionStore, ComicStore};

/// Handle to a set of in-memory tables. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over a copy of `state`.
    pub fn from_state(state: MemoryState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the current tables.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.read().await.clone()
    }

    /// Exclusive access to the tables until the guard is dropped.
    ///
    /// Every other reader and writer of this store waits meanwhile.
    pub async fn lock_exclusive(&self) -> OwnedRwLockWriteGuard<MemoryState> {
        Arc::clone(&self.state).write_owned().await
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn create(&self, collection: &Collection) -> AppResult<Collection> {
        self.state.write().await.insert_collection(collection)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Collection>> {
        Ok(self.state.read().await.get_collection(user_id, id))
    }

    async fn list(&self, user_id: Uuid, filter: ParentFilter) -> AppResult<Vec<Collection>> {
        Ok(self.state.read().await.list_collections(user_id, filter))
    }

    async fn update(&self, collection: &Collection) -> AppResult<Collection> {
        self.state.write().await.update_collection(collection)
    }

    async fn find_by_name(
        &self,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Collection>> {
        Ok(self
            .state
            .read()
            .await
            .find_collection_by_name(user_id, parent_id, name))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.delete_collection(user_id, id))
    }
}

#[async_trait]
impl ComicStore for MemoryStore {
    async fn create(&self, comic: &Comic) -> AppResult<Comic> {
        self.state.write().await.insert_comic(comic)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Comic>> {
        Ok(self.state.read().await.get_comic(user_id, id))
    }

    async fn list(&self, user_id: Uuid, filter: &ComicFilter) -> AppResult<Vec<Comic>> {
        Ok(self.state.read().await.list_comics(user_id, filter))
    }

    async fn update(&self, user_id: Uuid, comic: &Comic) -> AppResult<Comic> {
        self.state.write().await.update_comic(user_id, comic)
    }

    async fn toggle_read(
        &self,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Comic>> {
        Ok(self.state.write().await.toggle_comic(user_id, id, now))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.delete_comic(user_id, id))
    }

    async fn bulk_update_by_collection(
        &self,
        collection_id: Uuid,
        state: ReadState,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        Ok(self
            .state
            .write()
            .await
            .mark_collection(collection_id, state, now))
    }

    async fn delete_by_collection(&self, collection_id: Uuid) -> AppResult<u64> {
        Ok(self.state.write().await.delete_comics_of(collection_id))
    }

    async fn insert_many(
        &self,
        collection_id: Uuid,
        comics: &[NewComic],
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.state
            .write()
            .await
            .insert_comics(collection_id, comics, now)
    }

    async fn read_tallies(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, ReadTally>> {
        Ok(self.state.read().await.tallies(user_id))
    }

    async fn reading_stats(
        &self,
        user_id: Uuid,
        windows: &ReadingWindows,
    ) -> AppResult<ReadingStats> {
        Ok(self.state.read().await.stats(user_id, windows))
    }
}
