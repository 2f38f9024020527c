//! Comic repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use shelf_core::error::{AppError, ErrorKind};
use shelf_core::result::AppResult;
use shelf_entity::{
    Comic, ComicFilter, NewComic, ReadState, ReadTally, ReadingStats, ReadingWindows,
};

use crate::store::ComicStore;

/// Rows per multi-row insert; 11 binds each stays under the bind limit.
pub(crate) const INSERT_BATCH_SIZE: usize = 1000;

/// Repository for comic CRUD, bulk updates and aggregate queries.
#[derive(Debug, Clone)]
pub struct ComicRepository {
    pool: PgPool,
}

impl ComicRepository {
    /// Create a new comic repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComicStore for ComicRepository {
    async fn create(&self, comic: &Comic) -> AppResult<Comic> {
        insert(&self.pool, comic).await
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Comic>> {
        find_by_id(&self.pool, user_id, id).await
    }

    async fn list(&self, user_id: Uuid, filter: &ComicFilter) -> AppResult<Vec<Comic>> {
        list(&self.pool, user_id, filter).await
    }

    async fn update(&self, user_id: Uuid, comic: &Comic) -> AppResult<Comic> {
        update(&self.pool, user_id, comic).await
    }

    async fn toggle_read(
        &self,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Comic>> {
        toggle_read(&self.pool, user_id, id, now).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        delete(&self.pool, user_id, id).await
    }

    async fn bulk_update_by_collection(
        &self,
        collection_id: Uuid,
        state: ReadState,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        set_read_state(&self.pool, collection_id, state, now).await
    }

    async fn delete_by_collection(&self, collection_id: Uuid) -> AppResult<u64> {
        delete_by_collection(&self.pool, collection_id).await
    }

    async fn insert_many(
        &self,
        collection_id: Uuid,
        comics: &[NewComic],
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let rows = build_rows(collection_id, comics, now);
        let mut inserted = 0;
        for chunk in rows.chunks(INSERT_BATCH_SIZE) {
            inserted += insert_batch(&self.pool, chunk).await?;
        }
        Ok(inserted)
    }

    async fn read_tallies(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, ReadTally>> {
        read_tallies(&self.pool, user_id).await
    }

    async fn reading_stats(
        &self,
        user_id: Uuid,
        windows: &ReadingWindows,
    ) -> AppResult<ReadingStats> {
        reading_stats(&self.pool, user_id, windows).await
    }
}

/// Materialize structure comics as records of `collection_id`.
pub(crate) fn build_rows(collection_id: Uuid, comics: &[NewComic], now: DateTime<Utc>) -> Vec<Comic> {
    comics
        .iter()
        .cloned()
        .map(|comic| comic.into_comic(collection_id, now))
        .collect()
}

/// Escape `%`, `_` and `\` for use inside an `ILIKE` pattern.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn map_insert_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found("Collection not found")
        }
        _ => AppError::with_source(ErrorKind::Database, "Failed to create comic", e),
    }
}

/// Insert a single comic record.
pub(crate) async fn insert<'e, E>(executor: E, comic: &Comic) -> AppResult<Comic>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comic>(
        "INSERT INTO comics (id, collection_id, name, path, directories, is_read, read_at, \
         comment, rating, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
    )
    .bind(comic.id)
    .bind(comic.collection_id)
    .bind(&comic.name)
    .bind(&comic.path)
    .bind(&comic.directories)
    .bind(comic.is_read)
    .bind(comic.read_at)
    .bind(&comic.comment)
    .bind(comic.rating)
    .bind(comic.created_at)
    .bind(comic.updated_at)
    .fetch_one(executor)
    .await
    .map_err(map_insert_error)
}

/// Insert up to [`INSERT_BATCH_SIZE`] comic records in one statement.
pub(crate) async fn insert_batch<'e, E>(executor: E, rows: &[Comic]) -> AppResult<u64>
where
    E: PgExecutor<'e>,
{
    if rows.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO comics (id, collection_id, name, path, directories, is_read, read_at, \
         comment, rating, created_at, updated_at) ",
    );
    builder.push_values(rows, |mut row, comic| {
        row.push_bind(comic.id)
            .push_bind(comic.collection_id)
            .push_bind(comic.name.clone())
            .push_bind(comic.path.clone())
            .push_bind(comic.directories.clone())
            .push_bind(comic.is_read)
            .push_bind(comic.read_at)
            .push_bind(comic.comment.clone())
            .push_bind(comic.rating)
            .push_bind(comic.created_at)
            .push_bind(comic.updated_at);
    });

    builder
        .build()
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(map_insert_error)
}

/// Find one of the user's comics by ID.
pub(crate) async fn find_by_id<'e, E>(
    executor: E,
    user_id: Uuid,
    id: Uuid,
) -> AppResult<Option<Comic>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comic>(
        "SELECT m.* FROM comics m JOIN collections c ON c.id = m.collection_id \
         WHERE m.id = $1 AND c.user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comic", e))
}

/// List the user's comics matching a filter.
pub(crate) async fn list<'e, E>(
    executor: E,
    user_id: Uuid,
    filter: &ComicFilter,
) -> AppResult<Vec<Comic>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comic>(
        "SELECT m.* FROM comics m JOIN collections c ON c.id = m.collection_id \
         WHERE c.user_id = $1 \
           AND ($2::boolean IS NULL OR m.is_read = $2) \
           AND ($3::text IS NULL OR m.name ILIKE '%' || $3 || '%' ESCAPE '\\') \
           AND ($4::uuid IS NULL OR m.collection_id = $4) \
         ORDER BY m.name COLLATE \"C\" ASC, m.id ASC",
    )
    .bind(user_id)
    .bind(filter.is_read)
    .bind(filter.name_pattern().map(escape_like))
    .bind(filter.collection_id)
    .fetch_all(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comics", e))
}

/// Persist every mutable field of one of the user's comics.
pub(crate) async fn update<'e, E>(executor: E, user_id: Uuid, comic: &Comic) -> AppResult<Comic>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comic>(
        "UPDATE comics m SET name = $2, path = $3, is_read = $4, read_at = $5, comment = $6, \
             rating = $7, updated_at = $8 \
         FROM collections c \
         WHERE m.id = $1 AND c.id = m.collection_id AND c.user_id = $9 \
         RETURNING m.*",
    )
    .bind(comic.id)
    .bind(&comic.name)
    .bind(&comic.path)
    .bind(comic.is_read)
    .bind(comic.read_at)
    .bind(&comic.comment)
    .bind(comic.rating)
    .bind(comic.updated_at)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update comic", e))?
    .ok_or_else(|| AppError::not_found(format!("Comic {} not found", comic.id)))
}

/// Flip `is_read` in place; `read_at` follows the new value.
pub(crate) async fn toggle_read<'e, E>(
    executor: E,
    user_id: Uuid,
    id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Option<Comic>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comic>(
        "UPDATE comics m SET is_read = NOT m.is_read, \
             read_at = CASE WHEN m.is_read THEN NULL ELSE $3 END, \
             updated_at = $3 \
         FROM collections c \
         WHERE m.id = $1 AND c.id = m.collection_id AND c.user_id = $2 \
         RETURNING m.*",
    )
    .bind(id)
    .bind(user_id)
    .bind(now)
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to toggle comic", e))
}

/// Delete one of the user's comics.
pub(crate) async fn delete<'e, E>(executor: E, user_id: Uuid, id: Uuid) -> AppResult<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "DELETE FROM comics m USING collections c \
         WHERE m.id = $1 AND c.id = m.collection_id AND c.user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .execute(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete comic", e))?;

    Ok(result.rows_affected() > 0)
}

/// Write a read state on every comic of one collection.
pub(crate) async fn set_read_state<'e, E>(
    executor: E,
    collection_id: Uuid,
    state: ReadState,
    now: DateTime<Utc>,
) -> AppResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE comics SET is_read = $2, read_at = $3, updated_at = $4 WHERE collection_id = $1",
    )
    .bind(collection_id)
    .bind(state.is_read)
    .bind(state.read_at)
    .bind(now)
    .execute(executor)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to update collection comics", e)
    })?;

    Ok(result.rows_affected())
}

/// Delete every comic of one collection.
pub(crate) async fn delete_by_collection<'e, E>(executor: E, collection_id: Uuid) -> AppResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM comics WHERE collection_id = $1")
        .bind(collection_id)
        .execute(executor)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete collection comics", e)
        })?;

    Ok(result.rows_affected())
}

/// Per-collection comic and read counts for one user.
pub(crate) async fn read_tallies<'e, E>(
    executor: E,
    user_id: Uuid,
) -> AppResult<HashMap<Uuid, ReadTally>>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<(Uuid, i64, i64)> = sqlx::query_as(
        "SELECT m.collection_id, COUNT(*), COUNT(*) FILTER (WHERE m.is_read) \
         FROM comics m JOIN collections c ON c.id = m.collection_id \
         WHERE c.user_id = $1 GROUP BY m.collection_id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count comics", e))?;

    Ok(rows
        .into_iter()
        .map(|(id, total, read)| (id, ReadTally::new(total as u64, read as u64)))
        .collect())
}

/// Reading statistics for one user.
pub(crate) async fn reading_stats<'e, E>(
    executor: E,
    user_id: Uuid,
    windows: &ReadingWindows,
) -> AppResult<ReadingStats>
where
    E: PgExecutor<'e>,
{
    let (total, read, weekly, monthly, yearly): (i64, i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE m.is_read), \
                COUNT(*) FILTER (WHERE m.is_read AND m.read_at >= $2), \
                COUNT(*) FILTER (WHERE m.is_read AND m.read_at >= $3), \
                COUNT(*) FILTER (WHERE m.is_read AND m.read_at >= $4) \
         FROM comics m JOIN collections c ON c.id = m.collection_id \
         WHERE c.user_id = $1",
    )
    .bind(user_id)
    .bind(windows.week_start)
    .bind(windows.month_start)
    .bind(windows.year_start)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compute reading stats", e))?;

    Ok(ReadingStats::from_counts(
        total as u64,
        read as u64,
        weekly as u64,
        monthly as u64,
        yearly as u64,
    ))
}
