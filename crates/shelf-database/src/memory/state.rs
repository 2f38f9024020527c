//! Table storage for the in-memory backend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use shelf_core::error::AppError;
use shelf_core::result::AppResult;
use shelf_entity::{
    Collection, Comic, ComicFilter, NewComic, ParentFilter, ReadState, ReadTally, ReadingStats,
    ReadingWindows,
};

/// Collections and comics keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    collections: HashMap<Uuid, Collection>,
    comics: HashMap<Uuid, Comic>,
}

impl MemoryState {
    fn owns_collection(&self, user_id: Uuid, collection_id: Uuid) -> bool {
        self.collections
            .get(&collection_id)
            .is_some_and(|c| c.is_owned_by(user_id))
    }

    pub(crate) fn insert_collection(&mut self, collection: &Collection) -> AppResult<Collection> {
        if let Some(parent_id) = collection.parent_id {
            if !self.collections.contains_key(&parent_id) {
                return Err(AppError::not_found(format!(
                    "Parent collection {parent_id} not found"
                )));
            }
        }
        if self.collections.contains_key(&collection.id) {
            return Err(AppError::conflict(format!(
                "Collection {} already exists",
                collection.id
            )));
        }
        self.collections.insert(collection.id, collection.clone());
        Ok(collection.clone())
    }

    pub(crate) fn get_collection(&self, user_id: Uuid, id: Uuid) -> Option<Collection> {
        self.collections
            .get(&id)
            .filter(|c| c.is_owned_by(user_id))
            .cloned()
    }

    pub(crate) fn list_collections(&self, user_id: Uuid, filter: ParentFilter) -> Vec<Collection> {
        let mut found: Vec<Collection> = self
            .collections
            .values()
            .filter(|c| c.is_owned_by(user_id) && filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        found
    }

    pub(crate) fn update_collection(&mut self, collection: &Collection) -> AppResult<Collection> {
        match self.collections.get_mut(&collection.id) {
            Some(existing) if existing.user_id == collection.user_id => {
                existing.name = collection.name.clone();
                existing.comment = collection.comment.clone();
                existing.rating = collection.rating;
                existing.updated_at = collection.updated_at;
                Ok(existing.clone())
            }
            _ => Err(AppError::not_found(format!(
                "Collection {} not found",
                collection.id
            ))),
        }
    }

    pub(crate) fn find_collection_by_name(
        &self,
        user_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Option<Collection> {
        self.collections
            .values()
            .filter(|c| c.is_owned_by(user_id) && c.parent_id == parent_id && c.name == name)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned()
    }

    pub(crate) fn delete_collection(&mut self, user_id: Uuid, id: Uuid) -> bool {
        if !self.owns_collection(user_id, id) {
            return false;
        }
        self.collections.remove(&id).is_some()
    }

    pub(crate) fn insert_comic(&mut self, comic: &Comic) -> AppResult<Comic> {
        if !self.collections.contains_key(&comic.collection_id) {
            return Err(AppError::not_found(format!(
                "Collection {} not found",
                comic.collection_id
            )));
        }
        self.comics.insert(comic.id, comic.clone());
        Ok(comic.clone())
    }

    pub(crate) fn get_comic(&self, user_id: Uuid, id: Uuid) -> Option<Comic> {
        self.comics
            .get(&id)
            .filter(|m| self.owns_collection(user_id, m.collection_id))
            .cloned()
    }

    pub(crate) fn list_comics(&self, user_id: Uuid, filter: &ComicFilter) -> Vec<Comic> {
        let mut found: Vec<Comic> = self
            .comics
            .values()
            .filter(|m| self.owns_collection(user_id, m.collection_id) && filter.matches(m))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        found
    }

    pub(crate) fn update_comic(&mut self, user_id: Uuid, comic: &Comic) -> AppResult<Comic> {
        let owned = self
            .comics
            .get(&comic.id)
            .is_some_and(|existing| self.owns_collection(user_id, existing.collection_id));
        match self.comics.get_mut(&comic.id) {
            Some(existing) if owned => {
                existing.name = comic.name.clone();
                existing.path = comic.path.clone();
                existing.is_read = comic.is_read;
                existing.read_at = comic.read_at;
                existing.comment = comic.comment.clone();
                existing.rating = comic.rating;
                existing.updated_at = comic.updated_at;
                Ok(existing.clone())
            }
            _ => Err(AppError::not_found(format!("Comic {} not found", comic.id))),
        }
    }

    pub(crate) fn toggle_comic(
        &mut self,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<Comic> {
        let collection_id = self.comics.get(&id)?.collection_id;
        if !self.owns_collection(user_id, collection_id) {
            return None;
        }
        let comic = self.comics.get_mut(&id)?;
        comic.toggle_read(now);
        Some(comic.clone())
    }

    pub(crate) fn delete_comic(&mut self, user_id: Uuid, id: Uuid) -> bool {
        let owned = self
            .comics
            .get(&id)
            .is_some_and(|m| self.owns_collection(user_id, m.collection_id));
        owned && self.comics.remove(&id).is_some()
    }

    pub(crate) fn mark_collection(
        &mut self,
        collection_id: Uuid,
        state: ReadState,
        now: DateTime<Utc>,
    ) -> u64 {
        let mut touched = 0;
        for comic in self
            .comics
            .values_mut()
            .filter(|m| m.collection_id == collection_id)
        {
            comic.apply_read_state(state, now);
            touched += 1;
        }
        touched
    }

    pub(crate) fn delete_comics_of(&mut self, collection_id: Uuid) -> u64 {
        let before = self.comics.len();
        self.comics.retain(|_, m| m.collection_id != collection_id);
        (before - self.comics.len()) as u64
    }

    pub(crate) fn insert_comics(
        &mut self,
        collection_id: Uuid,
        comics: &[NewComic],
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        if !self.collections.contains_key(&collection_id) {
            return Err(AppError::not_found(format!(
                "Collection {collection_id} not found"
            )));
        }
        for new_comic in comics {
            let comic = new_comic.clone().into_comic(collection_id, now);
            self.comics.insert(comic.id, comic);
        }
        Ok(comics.len() as u64)
    }

    pub(crate) fn tallies(&self, user_id: Uuid) -> HashMap<Uuid, ReadTally> {
        let mut tallies: HashMap<Uuid, ReadTally> = HashMap::new();
        for comic in self
            .comics
            .values()
            .filter(|m| self.owns_collection(user_id, m.collection_id))
        {
            *tallies.entry(comic.collection_id).or_default() +=
                ReadTally::from_flags([comic.is_read]);
        }
        tallies
    }

    pub(crate) fn stats(&self, user_id: Uuid, windows: &ReadingWindows) -> ReadingStats {
        ReadingStats::compute(
            self.comics
                .values()
                .filter(|m| self.owns_collection(user_id, m.collection_id)),
            windows,
        )
    }
}
