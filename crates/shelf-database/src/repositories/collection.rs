//! Collection repository implementation.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use shelf_core::error::{AppError, ErrorKind};
use shelf_core::result::AppResult;
use shelf_entity::{Collection, ParentFilter};

use crate::store::CollectionStore;

/// Repository for collection CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: PgPool,
}

impl CollectionRepository {
    /// Create a new collection repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionStore for CollectionRepository {
    async fn create(&self, collection: &Collection) -> AppResult<Collection> {
        insert(&self.pool, collection).await
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Collection>> {
        find_by_id(&self.pool, user_id, id).await
    }

    async fn list(&self, user_id: Uuid, filter: ParentFilter) -> AppResult<Vec<Collection>> {
        list(&self.pool, user_id, filter).await
    }

    async fn update(&self, collection: &Collection) -> AppResult<Collection> {
        update(&self.pool, collection).await
    }

    async fn find_by_name(
        &self,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<Option<Collection>> {
        find_by_name(&self.pool, user_id, parent_id, name).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        delete(&self.pool, user_id, id).await
    }
}

/// Insert a collection record.
pub(crate) async fn insert<'e, E>(executor: E, data: &Collection) -> AppResult<Collection>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Collection>(
        "INSERT INTO collections (id, user_id, parent_id, name, comment, rating, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(data.id)
    .bind(data.user_id)
    .bind(data.parent_id)
    .bind(&data.name)
    .bind(&data.comment)
    .bind(data.rating)
    .bind(data.created_at)
    .bind(data.updated_at)
    .fetch_one(executor)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found("Parent collection not found")
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to create collection", e),
    })
}

/// Find one of the user's collections by ID.
pub(crate) async fn find_by_id<'e, E>(
    executor: E,
    user_id: Uuid,
    id: Uuid,
) -> AppResult<Option<Collection>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find collection", e))
}

/// List the user's collections, optionally restricted by parent.
pub(crate) async fn list<'e, E>(
    executor: E,
    user_id: Uuid,
    filter: ParentFilter,
) -> AppResult<Vec<Collection>>
where
    E: PgExecutor<'e>,
{
    let query = match filter {
        ParentFilter::All => sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections WHERE user_id = $1 \
             ORDER BY name COLLATE \"C\" ASC, id ASC",
        )
        .bind(user_id),
        ParentFilter::Root => sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections WHERE user_id = $1 AND parent_id IS NULL \
             ORDER BY name COLLATE \"C\" ASC, id ASC",
        )
        .bind(user_id),
        ParentFilter::Parent(parent_id) => sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections WHERE user_id = $1 AND parent_id = $2 \
             ORDER BY name COLLATE \"C\" ASC, id ASC",
        )
        .bind(user_id)
        .bind(parent_id),
    };

    query
        .fetch_all(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list collections", e))
}

/// Persist name, comment, rating and `updated_at`.
pub(crate) async fn update<'e, E>(executor: E, data: &Collection) -> AppResult<Collection>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Collection>(
        "UPDATE collections SET name = $3, comment = $4, rating = $5, updated_at = $6 \
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(data.id)
    .bind(data.user_id)
    .bind(&data.name)
    .bind(&data.comment)
    .bind(data.rating)
    .bind(data.updated_at)
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update collection", e))?
    .ok_or_else(|| AppError::not_found(format!("Collection {} not found", data.id)))
}

/// Find a collection by exact `(user, parent, name)`.
pub(crate) async fn find_by_name<'e, E>(
    executor: E,
    user_id: Uuid,
    parent_id: Option<Uuid>,
    name: &str,
) -> AppResult<Option<Collection>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Collection>(
        "SELECT * FROM collections \
         WHERE user_id = $1 AND parent_id IS NOT DISTINCT FROM $2 AND name = $3 \
         ORDER BY created_at ASC, id ASC LIMIT 1",
    )
    .bind(user_id)
    .bind(parent_id)
    .bind(name)
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to find collection by name", e)
    })
}

/// Delete a single collection row.
pub(crate) async fn delete<'e, E>(executor: E, user_id: Uuid, id: Uuid) -> AppResult<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM collections WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete collection", e))?;

    Ok(result.rows_affected() > 0)
}
