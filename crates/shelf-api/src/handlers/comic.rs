//! Comic CRUD, read toggling and statistics handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_entity::{Comic, ReadingStats};

use crate::dto::request::{ComicListQuery, CreateComicBody, UpdateComicBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/comics?isRead=...&name=...&collectionId=...
pub async fn list_comics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ComicListQuery>,
) -> Result<Json<ApiResponse<Vec<Comic>>>, AppError> {
    let filter = query.into_filter()?;
    let comics = state.comic_service.list_comics(&auth, &filter).await?;
    Ok(Json(ApiResponse::ok(comics)))
}

/// GET /api/comics/stats
pub async fn reading_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<ReadingStats>>, AppError> {
    let stats = state.stats_service.reading_stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/comics/{id}
pub async fn get_comic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Comic>>, AppError> {
    let comic = state.comic_service.get_comic(&auth, id).await?;
    Ok(Json(ApiResponse::ok(comic)))
}

/// POST /api/comics
pub async fn create_comic(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateComicBody>,
) -> Result<(StatusCode, Json<ApiResponse<Comic>>), AppError> {
    let comic = state.comic_service.create_comic(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comic))))
}

/// PATCH /api/comics/{id}
pub async fn update_comic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateComicBody>,
) -> Result<Json<ApiResponse<Comic>>, AppError> {
    let comic = state
        .comic_service
        .update_comic(&auth, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(comic)))
}

/// PATCH /api/comics/{id}/toggle-read
pub async fn toggle_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Comic>>, AppError> {
    let comic = state.comic_service.toggle_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(comic)))
}

/// DELETE /api/comics/{id}
pub async fn delete_comic(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.comic_service.delete_comic(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Comic deleted"))))
}
