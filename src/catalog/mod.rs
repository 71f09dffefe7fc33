//! Keyed store of canonical catalog items.
//!
//! The same work is frequently sighted once per country during ingestion;
//! [`Library::add`] folds repeated sightings into one record instead of
//! duplicating it. Validity filtering lives here too so the orchestrator
//! only ever sees playable items.

mod item;

pub use item::{
    CatalogItem, EffectiveRating, RATING_SOURCE_BAYESIAN, RATING_SOURCE_RAW, RatingPair, Window,
    is_playable,
};

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Mapping `id -> CatalogItem`. Insertion order carries no meaning.
#[derive(Debug, Default)]
pub struct Library {
    items: HashMap<String, CatalogItem>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge an item.
    ///
    /// Idempotent with respect to identity: a second insertion of the
    /// same id merges availability maps instead of replacing the record.
    /// For country keys present in both, the incoming window wins -
    /// later ingestion passes carry fresher data.
    pub fn add(&mut self, item: CatalogItem) {
        match self.items.get_mut(&item.id) {
            Some(existing) => {
                for (country, window) in item.availability {
                    existing.availability.insert(country, window);
                }
            }
            None => {
                self.items.insert(item.id.clone(), item);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    /// The subset of items playable at `now`.
    ///
    /// Items with an empty availability map are invalid, not errors -
    /// they are silently excluded.
    pub fn valid_items(&self, now: DateTime<Utc>) -> Vec<&CatalogItem> {
        self.items.values().filter(|i| is_playable(i, now)).collect()
    }
}
