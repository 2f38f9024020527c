//! Tree operations over a user's collection forest: cascading deletion,
//! read-status aggregation, bulk read-marking and structure ingestion.
//!
//! Every multi-step operation runs inside one unit of work. With atomic
//! operations enabled it commits or rolls back as a whole; otherwise each
//! step commits on its own and a failure leaves the steps already taken.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_core::result::AppResult;
use shelf_core::types::{IngestMode, ReadScope};
use shelf_database::{StoreProvider, UnitOfWork};
use shelf_entity::{
    Collection, ComicFilter, CreateCollection, ParentFilter, ReadState, ReadTally, ScannedComic,
    StructureNode,
};

use super::aggregate::ReadAggregator;
use crate::context::RequestContext;
use crate::unit::finish;

/// Result of a cascading delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    /// Collections removed, the root included.
    pub collections_deleted: u64,
    /// Comics removed across the subtree.
    pub comics_deleted: u64,
}

/// Result of a structure ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// The collection resolved for the structure's root node.
    pub root: Collection,
    /// Mode the structure was ingested with.
    pub mode: IngestMode,
    /// Collections created because no match existed.
    pub collections_created: u64,
    /// Existing collections reused by `(name, user, parent)`.
    pub collections_matched: u64,
    /// Comics inserted.
    pub comics_inserted: u64,
    /// Comics purged from matched collections in overwrite mode.
    pub comics_removed: u64,
}

/// Multi-step operations over collection subtrees.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Store backend.
    store: Arc<dyn StoreProvider>,
    /// Scope used when a caller does not choose one.
    default_scope: ReadScope,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: Arc<dyn StoreProvider>, default_scope: ReadScope) -> Self {
        Self {
            store,
            default_scope,
        }
    }

    /// The configured default scope.
    pub fn default_scope(&self) -> ReadScope {
        self.default_scope
    }

    /// Deletes a collection, every descendant collection and every comic
    /// held anywhere in that subtree.
    pub async fn delete_subtree(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
    ) -> Result<DeleteSummary, AppError> {
        let unit = self.store.begin().await?;
        let result = delete_within(unit.as_ref(), ctx.user_id, collection_id).await;
        let summary = finish(unit, result).await?;

        info!(
            user_id = %ctx.user_id,
            collection_id = %collection_id,
            collections_deleted = summary.collections_deleted,
            comics_deleted = summary.comics_deleted,
            "Collection subtree deleted"
        );

        Ok(summary)
    }

    /// Fully read over the collection's own comics only.
    pub async fn fully_read_direct(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
    ) -> Result<bool, AppError> {
        self.require_collection(ctx, collection_id).await?;

        let comics = self
            .store
            .comics()
            .list(ctx.user_id, &ComicFilter::in_collection(collection_id))
            .await?;

        Ok(ReadTally::from_flags(comics.iter().map(|c| c.is_read)).is_fully_read())
    }

    /// Fully read over every comic in the collection's subtree.
    pub async fn fully_read_recursive(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
    ) -> Result<bool, AppError> {
        self.require_collection(ctx, collection_id).await?;

        let collections = self
            .store
            .collections()
            .list(ctx.user_id, ParentFilter::All)
            .await?;
        let tallies = self.store.comics().read_tallies(ctx.user_id).await?;

        Ok(ReadAggregator::new(&collections, tallies)
            .fully_read(collection_id, ReadScope::Recursive))
    }

    /// Fully read under `scope`, or the configured default.
    pub async fn fully_read(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        scope: Option<ReadScope>,
    ) -> Result<bool, AppError> {
        match scope.unwrap_or(self.default_scope) {
            ReadScope::Direct => self.fully_read_direct(ctx, collection_id).await,
            ReadScope::Recursive => self.fully_read_recursive(ctx, collection_id).await,
        }
    }

    /// Sets the read state of the collection's comics; with a recursive
    /// scope, of every comic in its subtree. Returns the number of comics
    /// touched.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        is_read: bool,
        scope: Option<ReadScope>,
    ) -> Result<u64, AppError> {
        let scope = scope.unwrap_or(self.default_scope);
        let now = Utc::now();

        let unit = self.store.begin().await?;
        let result =
            mark_within(unit.as_ref(), ctx.user_id, collection_id, is_read, scope, now).await;
        let touched = finish(unit, result).await?;

        info!(
            user_id = %ctx.user_id,
            collection_id = %collection_id,
            is_read,
            scope = %scope,
            touched,
            "Collection comics marked"
        );

        Ok(touched)
    }

    /// Merges a nested structure description into the caller's forest.
    ///
    /// Nodes are matched against existing collections by exact
    /// `(name, user, parent)`. Unmatched nodes are created. In overwrite
    /// mode, matched collections first lose their direct comics; child
    /// collections absent from the structure are left alone.
    pub async fn ingest(
        &self,
        ctx: &RequestContext,
        structure: StructureNode,
        mode: IngestMode,
        parent_id: Option<Uuid>,
    ) -> Result<IngestSummary, AppError> {
        structure.validate()?;

        let unit = self.store.begin().await?;
        let result = ingest_within(
            unit.as_ref(),
            ctx.user_id,
            &structure,
            mode,
            parent_id,
            Utc::now(),
        )
        .await;
        let summary = finish(unit, result).await?;

        info!(
            user_id = %ctx.user_id,
            root_id = %summary.root.id,
            mode = %mode,
            collections_created = summary.collections_created,
            collections_matched = summary.collections_matched,
            comics_inserted = summary.comics_inserted,
            comics_removed = summary.comics_removed,
            "Structure ingested"
        );

        Ok(summary)
    }

    /// Builds a structure from scanned files and ingests it.
    pub async fn ingest_scanned(
        &self,
        ctx: &RequestContext,
        root_name: &str,
        files: Vec<ScannedComic>,
        mode: IngestMode,
        parent_id: Option<Uuid>,
    ) -> Result<IngestSummary, AppError> {
        let structure = StructureNode::from_scanned(root_name, files);
        self.ingest(ctx, structure, mode, parent_id).await
    }

    async fn require_collection(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
    ) -> AppResult<Collection> {
        self.store
            .collections()
            .get(ctx.user_id, collection_id)
            .await?
            .ok_or_else(|| AppError::not_found("Collection not found"))
    }
}

async fn delete_within(
    unit: &dyn UnitOfWork,
    user_id: Uuid,
    root_id: Uuid,
) -> AppResult<DeleteSummary> {
    let collections = unit.collections();
    let comics = unit.comics();

    if collections.get(user_id, root_id).await?.is_none() {
        return Err(AppError::not_found("Collection not found"));
    }

    let mut summary = DeleteSummary::default();
    let mut visited = Vec::new();
    let mut stack = vec![root_id];

    while let Some(id) = stack.pop() {
        summary.comics_deleted += comics.delete_by_collection(id).await?;
        let children = collections.list(user_id, ParentFilter::Parent(id)).await?;
        stack.extend(children.iter().map(|child| child.id));
        visited.push(id);
    }

    // Children were visited after their parents; delete in reverse.
    for id in visited.iter().rev() {
        if collections.delete(user_id, *id).await? {
            summary.collections_deleted += 1;
        }
    }

    debug!(%root_id, nodes = visited.len(), "Subtree traversal finished");
    Ok(summary)
}

async fn mark_within(
    unit: &dyn UnitOfWork,
    user_id: Uuid,
    root_id: Uuid,
    is_read: bool,
    scope: ReadScope,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let collections = unit.collections();
    let comics = unit.comics();

    if collections.get(user_id, root_id).await?.is_none() {
        return Err(AppError::not_found("Collection not found"));
    }

    let state = ReadState::written(is_read, now);
    let mut touched = 0;
    let mut level = vec![root_id];

    while !level.is_empty() {
        let mut next = Vec::new();
        for id in level {
            touched += comics.bulk_update_by_collection(id, state, now).await?;
            if scope.is_recursive() {
                let children = collections.list(user_id, ParentFilter::Parent(id)).await?;
                next.extend(children.into_iter().map(|child| child.id));
            }
        }
        level = next;
    }

    Ok(touched)
}

async fn ingest_within(
    unit: &dyn UnitOfWork,
    user_id: Uuid,
    structure: &StructureNode,
    mode: IngestMode,
    parent_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> AppResult<IngestSummary> {
    let collections = unit.collections();
    let comics = unit.comics();

    if let Some(parent_id) = parent_id {
        if collections.get(user_id, parent_id).await?.is_none() {
            return Err(AppError::not_found("Parent collection not found"));
        }
    }

    let mut root = None;
    let mut created = 0;
    let mut matched = 0;
    let mut inserted = 0;
    let mut removed = 0;
    // Collections already resolved in this run are never purged again, so
    // duplicate sibling names in one structure merge instead of clobbering.
    let mut resolved: HashSet<Uuid> = HashSet::new();
    let mut stack: Vec<(&StructureNode, Option<Uuid>)> = vec![(structure, parent_id)];

    while let Some((node, parent)) = stack.pop() {
        let name = node.name.trim();

        let collection = match collections.find_by_name(user_id, parent, name).await? {
            Some(existing) => {
                matched += 1;
                if mode.purges_existing() && !resolved.contains(&existing.id) {
                    removed += comics.delete_by_collection(existing.id).await?;
                }
                existing
            }
            None => {
                created += 1;
                let record =
                    Collection::from_create(CreateCollection::named(user_id, parent, name), now);
                collections.create(&record).await?
            }
        };
        resolved.insert(collection.id);

        inserted += comics.insert_many(collection.id, &node.comics, now).await?;

        for child in node.children.iter().rev() {
            stack.push((child, Some(collection.id)));
        }
        if root.is_none() {
            root = Some(collection);
        }
    }

    let root = root.ok_or_else(|| AppError::internal("Structure produced no root collection"))?;

    Ok(IngestSummary {
        root,
        mode,
        collections_created: created,
        collections_matched: matched,
        comics_inserted: inserted,
        comics_removed: removed,
    })
}
