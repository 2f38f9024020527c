//! In-memory [`StoreProvider`] and its snapshot unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OwnedRwLockWriteGuard;
use tracing::debug;

use shelf_core::result::AppResult;

use super::state::MemoryState;
use super::store::MemoryStore;
use crate::store::{CollectionStore, ComicStore, StoreProvider, UnitOfWork};

/// Storage backend keeping every table in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreProvider {
    store: MemoryStore,
}

impl MemoryStoreProvider {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared table handle.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

#[async_trait]
impl StoreProvider for MemoryStoreProvider {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn collections(&self) -> Arc<dyn CollectionStore> {
        Arc::new(self.store.clone())
    }

    fn comics(&self) -> Arc<dyn ComicStore> {
        Arc::new(self.store.clone())
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let shared = self.store.lock_exclusive().await;
        let scratch = MemoryStore::from_state(MemoryState::clone(&shared));
        Ok(Box::new(MemoryUnitOfWork { shared, scratch }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Unit of work over a private copy of the tables.
///
/// The shared tables stay write-locked from begin until commit or
/// rollback, so units are serialized against every other access. Mutations
/// go to the copy; commit writes the copy back under the held lock.
#[derive(Debug)]
pub struct MemoryUnitOfWork {
    shared: OwnedRwLockWriteGuard<MemoryState>,
    scratch: MemoryStore,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn collections(&self) -> &dyn CollectionStore {
        &self.scratch
    }

    fn comics(&self) -> &dyn ComicStore {
        &self.scratch
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { mut shared, scratch } = *self;
        *shared = scratch.snapshot().await;
        debug!("Memory unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        debug!("Memory unit of work rolled back");
        Ok(())
    }
}
