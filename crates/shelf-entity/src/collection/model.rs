//! Collection entity model.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_core::result::AppResult;

/// Accepted collection rating values.
pub const COLLECTION_RATING_RANGE: RangeInclusive<i16> = 0..=5;

/// A node in a user's collection forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Unique collection identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Parent collection (null for roots).
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Rating in `0..=5`.
    pub rating: Option<i16>,
    /// When the collection was created.
    pub created_at: DateTime<Utc>,
    /// When the collection was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Builds a fresh record from creation data.
    pub fn from_create(data: CreateCollection, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            parent_id: data.parent_id,
            name: data.name.trim().to_string(),
            comment: data.comment,
            rating: data.rating,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a root collection (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check whether `user_id` owns this collection.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Data required to create a new collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollection {
    /// Owning user.
    pub user_id: Uuid,
    /// Parent collection (None for root).
    pub parent_id: Option<Uuid>,
    /// Collection name.
    pub name: String,
    /// Optional comment.
    pub comment: Option<String>,
    /// Optional rating.
    pub rating: Option<i16>,
}

impl CreateCollection {
    /// Minimal creation payload, as used by structure ingestion.
    pub fn named(user_id: Uuid, parent_id: Option<Uuid>, name: impl Into<String>) -> Self {
        Self {
            user_id,
            parent_id,
            name: name.into(),
            comment: None,
            rating: None,
        }
    }

    /// Validate field constraints.
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)?;
        validate_rating(self.rating)
    }
}

/// Partial update for a collection. Only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollection {
    /// New name.
    pub name: Option<String>,
    /// New comment.
    pub comment: Option<String>,
    /// New rating.
    pub rating: Option<i16>,
}

impl UpdateCollection {
    /// Validate the supplied fields.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_rating(self.rating)
    }

    /// Returns `true` when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.comment.is_none() && self.rating.is_none()
    }

    /// Merge the supplied fields into `collection`.
    pub fn apply_to(&self, collection: &mut Collection, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            collection.name = name.trim().to_string();
        }
        if let Some(comment) = &self.comment {
            collection.comment = Some(comment.clone());
        }
        if let Some(rating) = self.rating {
            collection.rating = Some(rating);
        }
        collection.updated_at = now;
    }
}

/// Restricts a collection listing by parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentFilter {
    /// Every collection of the user.
    #[default]
    All,
    /// Only collections without a parent.
    Root,
    /// Only direct children of the given collection.
    Parent(Uuid),
}

impl ParentFilter {
    /// Check whether `collection` passes the filter.
    pub fn matches(&self, collection: &Collection) -> bool {
        match self {
            Self::All => true,
            Self::Root => collection.parent_id.is_none(),
            Self::Parent(id) => collection.parent_id == Some(*id),
        }
    }

    /// Parses the `parent` query value: `"null"`/empty selects roots.
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None => Ok(Self::All),
            Some("") | Some("null") | Some("root") => Ok(Self::Root),
            Some(value) => Uuid::parse_str(value)
                .map(Self::Parent)
                .map_err(|_| AppError::validation(format!("Invalid parent id '{value}'"))),
        }
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Collection name cannot be empty"));
    }
    Ok(())
}

fn validate_rating(rating: Option<i16>) -> AppResult<()> {
    match rating {
        Some(r) if !COLLECTION_RATING_RANGE.contains(&r) => Err(AppError::validation(format!(
            "Collection rating must be between {} and {}",
            COLLECTION_RATING_RANGE.start(),
            COLLECTION_RATING_RANGE.end()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(parent_id: Option<Uuid>) -> Collection {
        Collection::from_create(
            CreateCollection::named(Uuid::new_v4(), parent_id, "  Marvel "),
            Utc::now(),
        )
    }

    #[test]
    fn test_create_trims_name() {
        let col = sample(None);
        assert_eq!(col.name, "Marvel");
        assert!(col.is_root());
    }

    #[test]
    fn test_create_validation() {
        let mut data = CreateCollection::named(Uuid::new_v4(), None, "   ");
        assert!(data.validate().is_err());

        data.name = "DC".to_string();
        data.rating = Some(6);
        assert!(data.validate().is_err());

        data.rating = Some(0);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_update_merges_only_supplied_fields() {
        let mut col = sample(None);
        col.comment = Some("old".to_string());
        let update = UpdateCollection {
            rating: Some(4),
            ..Default::default()
        };
        update.apply_to(&mut col, Utc::now());
        assert_eq!(col.name, "Marvel");
        assert_eq!(col.comment.as_deref(), Some("old"));
        assert_eq!(col.rating, Some(4));
    }

    #[test]
    fn test_parent_filter() {
        let parent = Uuid::new_v4();
        let root = sample(None);
        let child = sample(Some(parent));

        assert!(ParentFilter::All.matches(&child));
        assert!(ParentFilter::Root.matches(&root));
        assert!(!ParentFilter::Root.matches(&child));
        assert!(ParentFilter::Parent(parent).matches(&child));

        assert_eq!(ParentFilter::parse(None).unwrap(), ParentFilter::All);
        assert_eq!(ParentFilter::parse(Some("null")).unwrap(), ParentFilter::Root);
        assert_eq!(
            ParentFilter::parse(Some(&parent.to_string())).unwrap(),
            ParentFilter::Parent(parent)
        );
        assert!(ParentFilter::parse(Some("nope")).is_err());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(sample(None)).unwrap();
        assert!(json.get("parentId").is_some());
        assert!(json.get("userId").is_some());
    }
}
