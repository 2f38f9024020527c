//! Transaction-backed unit of work.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use shelf_core::error::{AppError, ErrorKind};
use shelf_core::result::AppResult;
use shelf_entity::{
    Collection, Comic, ComicFilter, NewComic, ParentFilter, ReadState, ReadTally, ReadingStats,
    ReadingWindows,
};

use super::{collection, comic};
use crate::store::{CollectionStore, ComicStore, UnitOfWork};

type PgTransaction = Transaction<'static, Postgres>;

/// Runs every store operation inside one PostgreSQL transaction.
pub struct PgUnitOfWork {
    tx: Mutex<Option<PgTransaction>>,
}

impl PgUnitOfWork {
    /// Wrap an open transaction.
    pub fn new(tx: PgTransaction) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }
}

impl fmt::Debug for PgUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgUnitOfWork").finish_non_exhaustive()
    }
}

fn active(slot: &mut Option<PgTransaction>) -> AppResult<&mut PgTransaction> {
    slot.as_mut()
        .ok_or_else(|| AppError::internal("Transaction already finished"))
}

#[async_trait]
impl CollectionStore for PgUnitOfWork {
    async fn create(&self, data: &Collection) -> AppResult<Collection> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        collection::insert(&mut **tx, data).await
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Collection>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        collection::find_by_id(&mut **tx, user_id, id).await
    }

    async fn list(&self, user_id: Uuid, filter: ParentFilter) -> AppResult<Vec<Collection>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        collection::list(&mut **tx, user_id, filter).await
    }

    async fn update(&self, data: &Collection) -> AppResult<Collection> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        collection::update(&mut **tx, data).await
    }

    async fn find_by_name(
        &self,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Collection>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        collection::find_by_name(&mut **tx, user_id, parent_id, name).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        collection::delete(&mut **tx, user_id, id).await
    }
}

#[async_trait]
impl ComicStore for PgUnitOfWork {
    async fn create(&self, data: &Comic) -> AppResult<Comic> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::insert(&mut **tx, data).await
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Comic>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::find_by_id(&mut **tx, user_id, id).await
    }

    async fn list(&self, user_id: Uuid, filter: &ComicFilter) -> AppResult<Vec<Comic>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::list(&mut **tx, user_id, filter).await
    }

    async fn update(&self, user_id: Uuid, data: &Comic) -> AppResult<Comic> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::update(&mut **tx, user_id, data).await
    }

    async fn toggle_read(
        &self,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Comic>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::toggle_read(&mut **tx, user_id, id, now).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::delete(&mut **tx, user_id, id).await
    }

    async fn bulk_update_by_collection(
        &self,
        collection_id: Uuid,
        state: ReadState,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::set_read_state(&mut **tx, collection_id, state, now).await
    }

    async fn delete_by_collection(&self, collection_id: Uuid) -> AppResult<u64> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::delete_by_collection(&mut **tx, collection_id).await
    }

    async fn insert_many(
        &self,
        collection_id: Uuid,
        comics: &[NewComic],
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let rows = comic::build_rows(collection_id, comics, now);
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        let mut inserted = 0;
        for chunk in rows.chunks(comic::INSERT_BATCH_SIZE) {
            inserted += comic::insert_batch(&mut **tx, chunk).await?;
        }
        Ok(inserted)
    }

    async fn read_tallies(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, ReadTally>> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::read_tallies(&mut **tx, user_id).await
    }

    async fn reading_stats(
        &self,
        user_id: Uuid,
        windows: &ReadingWindows,
    ) -> AppResult<ReadingStats> {
        let mut slot = self.tx.lock().await;
        let tx = active(&mut slot)?;
        comic::reading_stats(&mut **tx, user_id, windows).await
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn collections(&self) -> &dyn CollectionStore {
        self
    }

    fn comics(&self) -> &dyn ComicStore {
        self
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        if let Some(tx) = self.tx.into_inner() {
            tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
            })?;
            debug!("Transaction committed");
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        if let Some(tx) = self.tx.into_inner() {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
            })?;
            debug!("Transaction rolled back");
        }
        Ok(())
    }
}
