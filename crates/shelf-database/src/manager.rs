//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use shelf_core::config::{DatabaseConfig, TreeConfig};
use shelf_core::error::AppError;
use shelf_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStoreProvider;
use crate::migration::run_migrations;
use crate::repositories::PgStoreProvider;
use crate::store::{CollectionStore, ComicStore, StoreProvider, UnitOfWork};

/// Store manager wrapping the configured backend.
///
/// When atomic operations are disabled, [`StoreProvider::begin`] hands out
/// a pass-through unit whose steps commit individually.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn StoreProvider>,
    atomic: bool,
}

impl StoreManager {
    /// Create the backend named by `database.provider`.
    pub async fn new(database: &DatabaseConfig, tree: &TreeConfig) -> AppResult<Self> {
        let inner: Arc<dyn StoreProvider> = match database.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL store provider");
                let db = DatabasePool::connect(database).await?;
                if database.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Arc::new(PgStoreProvider::new(db))
            }
            "memory" => {
                info!("Initializing in-memory store provider");
                Arc::new(MemoryStoreProvider::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: postgres, memory"
                )));
            }
        };

        if !tree.atomic_operations {
            warn!("Atomic tree operations disabled; multi-step failures may leave partial state");
        }

        Ok(Self {
            inner,
            atomic: tree.atomic_operations,
        })
    }

    /// Create a store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn StoreProvider>, atomic: bool) -> Self {
        Self {
            inner: provider,
            atomic,
        }
    }

    /// Whether units of work are transactional.
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }
}

#[async_trait]
impl StoreProvider for StoreManager {
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    fn collections(&self) -> Arc<dyn CollectionStore> {
        self.inner.collections()
    }

    fn comics(&self) -> Arc<dyn ComicStore> {
        self.inner.comics()
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        if self.atomic {
            self.inner.begin().await
        } else {
            Ok(Box::new(PassThroughUnit {
                collections: self.inner.collections(),
                comics: self.inner.comics(),
            }))
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

/// Unit of work over the auto-committing stores.
#[derive(Debug)]
struct PassThroughUnit {
    collections: Arc<dyn CollectionStore>,
    comics: Arc<dyn ComicStore>,
}

#[async_trait]
impl UnitOfWork for PassThroughUnit {
    fn collections(&self) -> &dyn CollectionStore {
        self.collections.as_ref()
    }

    fn comics(&self) -> &dyn ComicStore {
        self.comics.as_ref()
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
