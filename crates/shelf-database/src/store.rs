//! Store traits for collections and comics.
//!
//! Every read and single-row mutation is scoped to one user, through an
//! explicit user id or, for collection inserts and updates, the record's own
//! `user_id`; a row owned by someone else is reported exactly like a missing
//! row. Comics carry no user column, so their ownership is checked through
//! their collection. The `*_by_collection` operations act on a collection id the
//! caller has already resolved and checked.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shelf_core::result::AppResult;
use shelf_entity::{
    Collection, Comic, ComicFilter, NewComic, ParentFilter, ReadState, ReadTally, ReadingStats,
    ReadingWindows,
};

/// Persistence for [`Collection`] records.
#[async_trait]
pub trait CollectionStore: Send + Sync + std::fmt::Debug {
    /// Insert a fully built record. A missing parent is `NotFound`.
    async fn create(&self, collection: &Collection) -> AppResult<Collection>;

    /// Fetch one of the user's collections.
    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Collection>>;

    /// List the user's collections, ordered by name then id.
    async fn list(&self, user_id: Uuid, filter: ParentFilter) -> AppResult<Vec<Collection>>;

    /// Persist the mutable fields of an existing record owned by
    /// `collection.user_id`.
    async fn update(&self, collection: &Collection) -> AppResult<Collection>;

    /// Find a collection by exact `(user, parent, name)`.
    async fn find_by_name(
        &self,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Collection>>;

    /// Delete a single collection row. Returns `false` when nothing matched.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;
}

/// Persistence for [`Comic`] records.
#[async_trait]
pub trait ComicStore: Send + Sync + std::fmt::Debug {
    /// Insert a fully built record. A missing collection is `NotFound`.
    async fn create(&self, comic: &Comic) -> AppResult<Comic>;

    /// Fetch one of the user's comics.
    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Comic>>;

    /// List the user's comics matching `filter`, ordered by name then id.
    async fn list(&self, user_id: Uuid, filter: &ComicFilter) -> AppResult<Vec<Comic>>;

    /// Persist the mutable fields of one of the user's comics. A comic of
    /// another user is `NotFound`.
    async fn update(&self, user_id: Uuid, comic: &Comic) -> AppResult<Comic>;

    /// Flip the read flag, applying the read-time coupling.
    async fn toggle_read(
        &self,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Comic>>;

    /// Delete one comic. Returns `false` when nothing matched.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// Write `state` on every comic of exactly `collection_id`.
    async fn bulk_update_by_collection(
        &self,
        collection_id: Uuid,
        state: ReadState,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete every comic of exactly `collection_id`.
    async fn delete_by_collection(&self, collection_id: Uuid) -> AppResult<u64>;

    /// Insert `comics` into `collection_id`.
    async fn insert_many(
        &self,
        collection_id: Uuid,
        comics: &[NewComic],
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Comic and read counts per collection, for all of the user's
    /// collections holding at least one comic.
    async fn read_tallies(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, ReadTally>>;

    /// Reading statistics over all of the user's comics.
    async fn reading_stats(
        &self,
        user_id: Uuid,
        windows: &ReadingWindows,
    ) -> AppResult<ReadingStats>;
}

/// A group of store operations that commit or roll back together.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Collection store bound to this unit.
    fn collections(&self) -> &dyn CollectionStore;

    /// Comic store bound to this unit.
    fn comics(&self) -> &dyn ComicStore;

    /// Make every mutation of this unit visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every mutation of this unit.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// A storage backend.
#[async_trait]
pub trait StoreProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;

    /// Auto-committing collection store.
    fn collections(&self) -> Arc<dyn CollectionStore>;

    /// Auto-committing comic store.
    fn comics(&self) -> Arc<dyn ComicStore>;

    /// Start a unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
