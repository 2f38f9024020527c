//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shelf_core::error::AppError;
use shelf_core::result::AppResult;
use shelf_core::types::{IngestMode, ReadScope};
use shelf_entity::{
    ComicFilter, NewComic, ParentFilter, ScannedComic, StructureNode, UpdateCollection, UpdateComic,
};
use shelf_service::{CreateCollectionRequest, CreateComicRequest};

/// Query string of `GET /api/collections` and the detail view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionListQuery {
    /// `null`/empty selects roots, a UUID selects its children, absent means all.
    pub parent: Option<String>,
    /// `direct` or `recursive`; absent uses the configured default.
    pub scope: Option<String>,
}

impl CollectionListQuery {
    /// Parsed parent filter.
    pub fn parent_filter(&self) -> AppResult<ParentFilter> {
        ParentFilter::parse(self.parent.as_deref())
    }

    /// Parsed scope override.
    pub fn read_scope(&self) -> AppResult<Option<ReadScope>> {
        self.scope.as_deref().map(str::parse).transpose()
    }
}

/// Query string of `GET /api/collections/tree`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeQuery {
    /// Optional root of the returned tree.
    pub root: Option<Uuid>,
}

/// Create collection request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionBody {
    /// Collection name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    /// Optional comment.
    pub comment: Option<String>,
    /// Optional rating.
    #[validate(range(min = 0, max = 5))]
    pub rating: Option<i16>,
    /// Parent collection.
    pub parent_id: Option<Uuid>,
}

impl From<CreateCollectionBody> for CreateCollectionRequest {
    fn from(body: CreateCollectionBody) -> Self {
        Self {
            name: body.name,
            comment: body.comment,
            rating: body.rating,
            parent_id: body.parent_id,
        }
    }
}

/// Partial collection update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionBody {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New comment.
    pub comment: Option<String>,
    /// New rating.
    #[validate(range(min = 0, max = 5))]
    pub rating: Option<i16>,
}

impl From<UpdateCollectionBody> for UpdateCollection {
    fn from(body: UpdateCollectionBody) -> Self {
        Self {
            name: body.name,
            comment: body.comment,
            rating: body.rating,
        }
    }
}

/// Bulk read-marking body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadBody {
    /// Target read flag.
    pub is_read: bool,
    /// Also mark descendants; absent uses the configured default.
    pub recursive: Option<bool>,
}

impl MarkReadBody {
    /// Scope override derived from `recursive`.
    pub fn scope(&self) -> Option<ReadScope> {
        self.recursive.map(ReadScope::from_recursive)
    }
}

/// Structure ingestion body.
///
/// Carries either a ready `structure` tree or a root `name` with a flat
/// list of scanned `files`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadStructureBody {
    /// Nested structure to merge.
    #[serde(default, alias = "collectionStructure")]
    pub structure: Option<StructureNode>,
    /// Root name for a flat file list.
    #[serde(default, alias = "collectionName")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Scanned files for the flat form.
    #[serde(default, alias = "comics")]
    pub files: Vec<ScannedComic>,
    /// Merge mode.
    pub mode: IngestMode,
    /// Collection to ingest under; absent ingests at the root level.
    pub parent_id: Option<Uuid>,
}

impl UploadStructureBody {
    /// Resolves the body into a structure tree.
    pub fn into_structure(self) -> AppResult<StructureNode> {
        match (self.structure, self.name) {
            (Some(structure), _) => Ok(structure),
            (None, Some(name)) => Ok(StructureNode::from_scanned(name, self.files)),
            (None, None) => Err(AppError::validation(
                "Either 'structure' or 'name' with 'files' is required",
            )),
        }
    }
}

/// Query string of `GET /api/comics`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicListQuery {
    /// `true` or `false`.
    pub is_read: Option<String>,
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Restrict to one collection.
    pub collection_id: Option<String>,
}

impl ComicListQuery {
    /// Parses the query into a filter.
    pub fn into_filter(self) -> AppResult<ComicFilter> {
        let is_read = self
            .is_read
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<bool>()
                    .map_err(|_| AppError::validation(format!("Invalid isRead '{raw}'")))
            })
            .transpose()?;

        let collection_id = self
            .collection_id
            .as_deref()
            .map(|raw| {
                Uuid::parse_str(raw.trim())
                    .map_err(|_| AppError::validation(format!("Invalid collectionId '{raw}'")))
            })
            .transpose()?;

        Ok(ComicFilter {
            is_read,
            name: self.name,
            collection_id,
        })
    }
}

/// Create comic request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComicBody {
    /// Target collection.
    pub collection_id: Uuid,
    /// Comic name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// File path.
    #[validate(length(min = 1, message = "Path is required"))]
    pub path: String,
    /// Directory segments recorded at scan time.
    #[serde(default)]
    pub directories: Vec<String>,
    /// Initial read flag.
    #[serde(default)]
    pub is_read: bool,
    /// Read time; kept only when `isRead` is true.
    pub read_at: Option<DateTime<Utc>>,
    /// Optional comment.
    pub comment: Option<String>,
    /// Optional rating.
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,
}

impl From<CreateComicBody> for CreateComicRequest {
    fn from(body: CreateComicBody) -> Self {
        Self {
            collection_id: body.collection_id,
            comic: NewComic {
                name: body.name,
                path: body.path,
                directories: body.directories,
                is_read: body.is_read,
                read_at: body.read_at,
                comment: body.comment,
                rating: body.rating,
            },
        }
    }
}

/// Partial comic update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComicBody {
    /// New read flag.
    pub is_read: Option<bool>,
    /// New rating.
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,
    /// New comment.
    pub comment: Option<String>,
    /// New name.
    #[validate(length(min = 1))]
    pub name: Option<String>,
    /// New path.
    #[validate(length(min = 1))]
    pub path: Option<String>,
}

impl From<UpdateComicBody> for UpdateComic {
    fn from(body: UpdateComicBody) -> Self {
        Self {
            is_read: body.is_read,
            rating: body.rating,
            comment: body.comment,
            name: body.name,
            path: body.path,
        }
    }
}
