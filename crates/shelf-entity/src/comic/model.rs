//! Comic entity model.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_core::result::AppResult;

use super::read::ReadState;

/// Accepted comic rating values.
pub const COMIC_RATING_RANGE: RangeInclusive<i16> = 1..=5;

/// A comic held by exactly one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    /// Unique comic identifier.
    pub id: Uuid,
    /// The owning collection.
    pub collection_id: Uuid,
    /// Display name.
    pub name: String,
    /// Location of the comic file as scanned.
    pub path: String,
    /// Directory segments recorded at ingestion.
    pub directories: Vec<String>,
    /// Whether the comic has been read.
    pub is_read: bool,
    /// When the comic was marked read.
    pub read_at: Option<DateTime<Utc>>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Rating in `1..=5`.
    pub rating: Option<i16>,
    /// When the comic was created.
    pub created_at: DateTime<Utc>,
    /// When the comic was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Comic {
    /// Write the read flag, stamping or clearing `read_at`.
    pub fn set_read(&mut self, is_read: bool, now: DateTime<Utc>) {
        self.apply_read_state(ReadState::written(is_read, now), now);
    }

    /// Flip the read flag.
    pub fn toggle_read(&mut self, now: DateTime<Utc>) {
        self.set_read(!self.is_read, now);
    }

    /// Overwrite the read pair with a precomputed state.
    pub fn apply_read_state(&mut self, state: ReadState, now: DateTime<Utc>) {
        self.is_read = state.is_read;
        self.read_at = state.read_at;
        self.updated_at = now;
    }

    /// Check whether the comic was read at or after `since`.
    pub fn read_since(&self, since: DateTime<Utc>) -> bool {
        self.is_read && self.read_at.is_some_and(|at| at >= since)
    }
}

/// Fields of a comic to be created, either through the API or as part of
/// an ingested structure node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComic {
    /// Comic name.
    pub name: String,
    /// Comic file path.
    pub path: String,
    /// Directory segments.
    #[serde(default)]
    pub directories: Vec<String>,
    /// Initial read flag.
    #[serde(default)]
    pub is_read: bool,
    /// Explicit read time, honored only when `is_read` is set.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    /// Optional comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Optional rating.
    #[serde(default)]
    pub rating: Option<i16>,
}

impl NewComic {
    /// Minimal unread comic.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            directories: Vec::new(),
            is_read: false,
            read_at: None,
            comment: None,
            rating: None,
        }
    }

    /// Mark the comic as read on creation.
    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Validate field constraints.
    pub fn validate(&self) -> AppResult<()> {
        validate_text("name", &self.name)?;
        validate_text("path", &self.path)?;
        validate_rating(self.rating)
    }

    /// Build the stored record for `collection_id`.
    pub fn into_comic(self, collection_id: Uuid, now: DateTime<Utc>) -> Comic {
        let state = ReadState::initial(self.is_read, self.read_at, now);
        Comic {
            id: Uuid::new_v4(),
            collection_id,
            name: self.name.trim().to_string(),
            path: self.path,
            directories: self.directories,
            is_read: state.is_read,
            read_at: state.read_at,
            comment: self.comment,
            rating: self.rating,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a comic. Each field is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComic {
    /// New read flag.
    pub is_read: Option<bool>,
    /// New rating.
    pub rating: Option<i16>,
    /// New comment.
    pub comment: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New path.
    pub path: Option<String>,
}

impl UpdateComic {
    /// Update that only writes the read flag.
    pub fn read_flag(is_read: bool) -> Self {
        Self {
            is_read: Some(is_read),
            ..Default::default()
        }
    }

    /// Validate the supplied fields.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_text("name", name)?;
        }
        if let Some(path) = &self.path {
            validate_text("path", path)?;
        }
        validate_rating(self.rating)
    }

    /// Returns `true` when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.is_read.is_none()
            && self.rating.is_none()
            && self.comment.is_none()
            && self.name.is_none()
            && self.path.is_none()
    }

    /// Merge the supplied fields into `comic`, applying the read coupling.
    pub fn apply_to(&self, comic: &mut Comic, now: DateTime<Utc>) {
        if let Some(is_read) = self.is_read {
            comic.set_read(is_read, now);
        }
        if let Some(rating) = self.rating {
            comic.rating = Some(rating);
        }
        if let Some(comment) = &self.comment {
            comic.comment = Some(comment.clone());
        }
        if let Some(name) = &self.name {
            comic.name = name.trim().to_string();
        }
        if let Some(path) = &self.path {
            comic.path = path.clone();
        }
        comic.updated_at = now;
    }
}

fn validate_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("Comic {field} cannot be empty")));
    }
    Ok(())
}

fn validate_rating(rating: Option<i16>) -> AppResult<()> {
    match rating {
        Some(r) if !COMIC_RATING_RANGE.contains(&r) => Err(AppError::validation(format!(
            "Comic rating must be between {} and {}",
            COMIC_RATING_RANGE.start(),
            COMIC_RATING_RANGE.end()
        ))),
        _ => Ok(()),
    }
}
