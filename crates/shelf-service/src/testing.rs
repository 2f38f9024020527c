//! Shared fixtures for service tests.

use std::sync::Arc;

use uuid::Uuid;

use shelf_database::memory::MemoryStoreProvider;
use shelf_database::{StoreManager, StoreProvider};

use crate::context::RequestContext;

/// A memory-backed store with the given atomicity.
pub(crate) fn memory_store(atomic: bool) -> Arc<dyn StoreProvider> {
    Arc::new(StoreManager::from_provider(
        Arc::new(MemoryStoreProvider::new()),
        atomic,
    ))
}

/// A context for a fresh random user.
pub(crate) fn ctx() -> RequestContext {
    RequestContext::new(Uuid::new_v4())
}
