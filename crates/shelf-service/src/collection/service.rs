//! Collection CRUD operations.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_database::StoreProvider;
use shelf_entity::{Collection, CreateCollection, ParentFilter, UpdateCollection};

use crate::context::RequestContext;

/// Manages single-collection operations. Deletion is subtree-wide and
/// lives on [`super::TreeService`].
#[derive(Debug, Clone)]
pub struct CollectionService {
    /// Store backend.
    store: Arc<dyn StoreProvider>,
}

/// Request to create a new collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    /// Collection name.
    pub name: String,
    /// Optional comment.
    pub comment: Option<String>,
    /// Optional rating in `0..=5`.
    pub rating: Option<i16>,
    /// Parent collection (None for a root).
    pub parent_id: Option<Uuid>,
}

impl CollectionService {
    /// Creates a new collection service.
    pub fn new(store: Arc<dyn StoreProvider>) -> Self {
        Self { store }
    }

    /// Creates a new collection, optionally under an owned parent.
    pub async fn create_collection(
        &self,
        ctx: &RequestContext,
        req: CreateCollectionRequest,
    ) -> Result<Collection, AppError> {
        let data = CreateCollection {
            user_id: ctx.user_id,
            parent_id: req.parent_id,
            name: req.name,
            comment: req.comment,
            rating: req.rating,
        };
        data.validate()?;

        let collections = self.store.collections();
        if let Some(parent_id) = data.parent_id {
            collections
                .get(ctx.user_id, parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent collection not found"))?;
        }

        let collection = collections
            .create(&Collection::from_create(data, Utc::now()))
            .await?;

        info!(
            user_id = %ctx.user_id,
            collection_id = %collection.id,
            parent_id = ?collection.parent_id,
            name = %collection.name,
            "Collection created"
        );

        Ok(collection)
    }

    /// Gets one of the caller's collections.
    pub async fn get_collection(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
    ) -> Result<Collection, AppError> {
        self.store
            .collections()
            .get(ctx.user_id, collection_id)
            .await?
            .ok_or_else(|| AppError::not_found("Collection not found"))
    }

    /// Lists the caller's collections.
    pub async fn list_collections(
        &self,
        ctx: &RequestContext,
        filter: ParentFilter,
    ) -> Result<Vec<Collection>, AppError> {
        self.store.collections().list(ctx.user_id, filter).await
    }

    /// Merges the supplied fields into a collection.
    pub async fn update_collection(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        update: UpdateCollection,
    ) -> Result<Collection, AppError> {
        update.validate()?;

        let mut collection = self.get_collection(ctx, collection_id).await?;
        update.apply_to(&mut collection, Utc::now());

        let collection = self.store.collections().update(&collection).await?;

        info!(
            user_id = %ctx.user_id,
            collection_id = %collection_id,
            "Collection updated"
        );

        Ok(collection)
    }
}
