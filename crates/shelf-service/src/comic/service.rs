//! Comic CRUD and read-state operations.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_database::StoreProvider;
use shelf_entity::{Comic, ComicFilter, NewComic, UpdateComic};

use crate::context::RequestContext;

/// Manages comics. A comic belongs to the caller when its collection does.
#[derive(Debug, Clone)]
pub struct ComicService {
    /// Store backend.
    store: Arc<dyn StoreProvider>,
}

/// Request to create a comic inside one of the caller's collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComicRequest {
    /// Target collection.
    pub collection_id: Uuid,
    /// Comic fields.
    #[serde(flatten)]
    pub comic: NewComic,
}

impl ComicService {
    /// Creates a new comic service.
    pub fn new(store: Arc<dyn StoreProvider>) -> Self {
        Self { store }
    }

    /// Creates a comic. The target collection must belong to the caller.
    pub async fn create_comic(
        &self,
        ctx: &RequestContext,
        req: CreateComicRequest,
    ) -> Result<Comic, AppError> {
        req.comic.validate()?;

        self.store
            .collections()
            .get(ctx.user_id, req.collection_id)
            .await?
            .ok_or_else(|| AppError::not_found("Collection not found"))?;

        let comic = self
            .store
            .comics()
            .create(&req.comic.into_comic(req.collection_id, Utc::now()))
            .await?;

        info!(
            user_id = %ctx.user_id,
            comic_id = %comic.id,
            collection_id = %comic.collection_id,
            "Comic created"
        );

        Ok(comic)
    }

    /// Gets one of the caller's comics.
    pub async fn get_comic(&self, ctx: &RequestContext, comic_id: Uuid) -> Result<Comic, AppError> {
        self.store
            .comics()
            .get(ctx.user_id, comic_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comic not found"))
    }

    /// Lists the caller's comics matching `filter`.
    pub async fn list_comics(
        &self,
        ctx: &RequestContext,
        filter: &ComicFilter,
    ) -> Result<Vec<Comic>, AppError> {
        self.store.comics().list(ctx.user_id, filter).await
    }

    /// Merges the supplied fields into a comic.
    pub async fn update_comic(
        &self,
        ctx: &RequestContext,
        comic_id: Uuid,
        update: UpdateComic,
    ) -> Result<Comic, AppError> {
        update.validate()?;

        let mut comic = self.get_comic(ctx, comic_id).await?;
        update.apply_to(&mut comic, Utc::now());

        let comic = self.store.comics().update(ctx.user_id, &comic).await?;

        info!(
            user_id = %ctx.user_id,
            comic_id = %comic_id,
            is_read = comic.is_read,
            "Comic updated"
        );

        Ok(comic)
    }

    /// Flips the read flag of a comic.
    pub async fn toggle_read(&self, ctx: &RequestContext, comic_id: Uuid) -> Result<Comic, AppError> {
        let comic = self
            .store
            .comics()
            .toggle_read(ctx.user_id, comic_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Comic not found"))?;

        info!(
            user_id = %ctx.user_id,
            comic_id = %comic_id,
            is_read = comic.is_read,
            "Comic read state toggled"
        );

        Ok(comic)
    }

    /// Deletes one of the caller's comics.
    pub async fn delete_comic(&self, ctx: &RequestContext, comic_id: Uuid) -> Result<(), AppError> {
        if !self.store.comics().delete(ctx.user_id, comic_id).await? {
            return Err(AppError::not_found("Comic not found"));
        }

        info!(user_id = %ctx.user_id, comic_id = %comic_id, "Comic deleted");
        Ok(())
    }
}
