//! PostgreSQL [`StoreProvider`].

use std::sync::Arc;

use async_trait::async_trait;

use shelf_core::error::{AppError, ErrorKind};
use shelf_core::result::AppResult;

use super::{CollectionRepository, ComicRepository, PgUnitOfWork};
use crate::connection::DatabasePool;
use crate::store::{CollectionStore, ComicStore, StoreProvider, UnitOfWork};

/// Storage backend over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStoreProvider {
    db: DatabasePool,
    collections: Arc<CollectionRepository>,
    comics: Arc<ComicRepository>,
}

impl PgStoreProvider {
    /// Create a provider over an established pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            collections: Arc::new(CollectionRepository::new(pool.clone())),
            comics: Arc::new(ComicRepository::new(pool)),
            db,
        }
    }

    /// The underlying pool.
    pub fn database(&self) -> &DatabasePool {
        &self.db
    }
}

#[async_trait]
impl StoreProvider for PgStoreProvider {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn collections(&self) -> Arc<dyn CollectionStore> {
        self.collections.clone()
    }

    fn comics(&self) -> Arc<dyn ComicStore> {
        self.comics.clone()
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.db.pool().begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgUnitOfWork::new(tx)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
