//! Collection CRUD, tree and ingestion handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_entity::{Collection, CollectionNode, CollectionSummary};
use shelf_service::{CollectionDetail, IngestSummary};

use crate::dto::request::{
    CollectionListQuery, CreateCollectionBody, MarkReadBody, TreeQuery, UpdateCollectionBody,
    UploadStructureBody,
};
use crate::dto::response::{ApiResponse, CollectionDeletedResponse, MarkReadResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/collections?parent=...&scope=...
pub async fn list_collections(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CollectionListQuery>,
) -> Result<Json<ApiResponse<Vec<CollectionSummary>>>, AppError> {
    let filter = query.parent_filter()?;
    let scope = query.read_scope()?;

    let collections = state
        .listing_service
        .list_collections(&auth, filter, scope)
        .await?;

    Ok(Json(ApiResponse::ok(collections)))
}

/// GET /api/collections/tree?root=...
pub async fn get_tree(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TreeQuery>,
) -> Result<Json<ApiResponse<Vec<CollectionNode>>>, AppError> {
    let tree = state.listing_service.tree(&auth, query.root).await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/collections/{id}
pub async fn get_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let collection = state.collection_service.get_collection(&auth, id).await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// GET /api/collections/{id}/detail?scope=...
pub async fn get_collection_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<CollectionListQuery>,
) -> Result<Json<ApiResponse<CollectionDetail>>, AppError> {
    let detail = state
        .listing_service
        .get_collection_detail(&auth, id, query.read_scope()?)
        .await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// POST /api/collections
pub async fn create_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateCollectionBody>,
) -> Result<(StatusCode, Json<ApiResponse<Collection>>), AppError> {
    let collection = state
        .collection_service
        .create_collection(&auth, body.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(collection))))
}

/// PATCH /api/collections/{id}
pub async fn update_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateCollectionBody>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let collection = state
        .collection_service
        .update_collection(&auth, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// DELETE /api/collections/{id}
pub async fn delete_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CollectionDeletedResponse>>, AppError> {
    let summary = state.tree_service.delete_subtree(&auth, id).await?;

    Ok(Json(ApiResponse::ok(CollectionDeletedResponse {
        message: "Collection and its contents deleted".to_string(),
        summary,
    })))
}

/// PATCH /api/collections/{id}/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<MarkReadBody>,
) -> Result<Json<ApiResponse<MarkReadResponse>>, AppError> {
    let updated = state
        .tree_service
        .mark_read(&auth, id, body.is_read, body.scope())
        .await?;

    let state_name = if body.is_read { "read" } else { "unread" };
    Ok(Json(ApiResponse::ok(MarkReadResponse {
        message: format!("Comics marked as {state_name}"),
        updated,
    })))
}

/// POST /api/collections/upload-structure
pub async fn upload_structure(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<UploadStructureBody>,
) -> Result<(StatusCode, Json<ApiResponse<IngestSummary>>), AppError> {
    let mode = body.mode;
    let parent_id = body.parent_id;
    let structure = body.into_structure()?;

    let summary = state
        .tree_service
        .ingest(&auth, structure, mode, parent_id)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(summary))))
}
