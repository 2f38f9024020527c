//! Collection listings annotated with read status, detail views and trees.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_core::types::ReadScope;
use shelf_database::StoreProvider;
use shelf_entity::{Collection, CollectionNode, CollectionSummary, Comic, ComicFilter, ParentFilter};

use crate::collection::ReadAggregator;
use crate::context::RequestContext;

/// A collection with its direct comics and direct children.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetail {
    /// The collection itself.
    pub collection: CollectionSummary,
    /// Comics owned directly by the collection.
    pub comics: Vec<Comic>,
    /// Direct child collections.
    pub children: Vec<CollectionSummary>,
}

/// Read paths over the caller's collection forest.
#[derive(Debug, Clone)]
pub struct ListingService {
    /// Store backend.
    store: Arc<dyn StoreProvider>,
    /// Scope used when a request does not choose one.
    default_scope: ReadScope,
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(store: Arc<dyn StoreProvider>, default_scope: ReadScope) -> Self {
        Self {
            store,
            default_scope,
        }
    }

    /// Lists collections with their derived read status.
    pub async fn list_collections(
        &self,
        ctx: &RequestContext,
        filter: ParentFilter,
        scope: Option<ReadScope>,
    ) -> Result<Vec<CollectionSummary>, AppError> {
        let scope = scope.unwrap_or(self.default_scope);
        let (all, aggregator) = self.load(ctx).await?;

        let summaries: Vec<CollectionSummary> = all
            .into_iter()
            .filter(|collection| filter.matches(collection))
            .map(|collection| aggregator.summarize(collection, scope))
            .collect();

        debug!(
            user_id = %ctx.user_id,
            scope = %scope,
            count = summaries.len(),
            "Collections listed"
        );

        Ok(summaries)
    }

    /// A collection with its direct comics and direct children.
    pub async fn get_collection_detail(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        scope: Option<ReadScope>,
    ) -> Result<CollectionDetail, AppError> {
        let scope = scope.unwrap_or(self.default_scope);
        let (all, aggregator) = self.load(ctx).await?;

        let mut target = None;
        let mut children = Vec::new();
        for collection in all {
            if collection.id == collection_id {
                target = Some(collection);
            } else if collection.parent_id == Some(collection_id) {
                children.push(aggregator.summarize(collection, scope));
            }
        }
        let target = target.ok_or_else(|| AppError::not_found("Collection not found"))?;

        let comics = self
            .store
            .comics()
            .list(ctx.user_id, &ComicFilter::in_collection(collection_id))
            .await?;

        Ok(CollectionDetail {
            collection: aggregator.summarize(target, scope),
            comics,
            children,
        })
    }

    /// Nested tree of the caller's collections, optionally under `root`.
    pub async fn tree(
        &self,
        ctx: &RequestContext,
        root: Option<Uuid>,
    ) -> Result<Vec<CollectionNode>, AppError> {
        let (all, aggregator) = self.load(ctx).await?;

        if let Some(root_id) = root {
            if !all.iter().any(|collection| collection.id == root_id) {
                return Err(AppError::not_found("Collection not found"));
            }
        }

        Ok(CollectionNode::build_forest(
            &all,
            &aggregator.comic_counts(),
            root,
        ))
    }

    async fn load(&self, ctx: &RequestContext) -> Result<(Vec<Collection>, ReadAggregator), AppError> {
        let all = self
            .store
            .collections()
            .list(ctx.user_id, ParentFilter::All)
            .await?;
        let tallies = self.store.comics().read_tallies(ctx.user_id).await?;
        let aggregator = ReadAggregator::new(&all, tallies);
        Ok((all, aggregator))
    }
}
