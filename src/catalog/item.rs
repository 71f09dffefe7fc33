//! Canonical catalog item model and the availability evaluator.
//!
//! These types are OUR types - raw records from the source adapters get
//! converted into them before anything downstream sees them. Playability
//! is derived purely from window timestamps; the free-text status a
//! source attaches to a window is advisory and never consulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A rating as reported by the catalog: average value plus vote count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPair {
    pub value: f64,
    pub votes: u64,
}

/// Per-country licensing window.
///
/// A missing `available_at` means the country contributes no playability
/// at all. A missing `ends_at` means the window is open-ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub available_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    /// Free-text availability label from the source. Advisory only.
    #[serde(default)]
    pub status: String,
}

/// Canonical record for one work, unified across all countries where it
/// is licensed. Two items with the same `id` are the same work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable unique key across ingestion passes.
    pub id: String,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    pub plot: Option<String>,
    pub web_url: Option<String>,
    pub artwork_url: Option<String>,
    /// Raw catalog rating.
    pub rating: RatingPair,
    /// Vote-calibrated rating, when the source publishes one.
    pub bayesian_rating: Option<RatingPair>,
    /// Per-country licensing windows, keyed by ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub availability: HashMap<String, Window>,
}

/// Rating source names used in descriptors.
pub const RATING_SOURCE_BAYESIAN: &str = "catalog-bayesian";
pub const RATING_SOURCE_RAW: &str = "catalog";

/// Whichever of {bayesian, raw} currently governs the stored value,
/// tagged with its source name. Derived, never stored on the item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRating {
    pub source: &'static str,
    pub value: f64,
    pub votes: u64,
}

impl EffectiveRating {
    /// Bayesian pair wins when present, otherwise the raw pair.
    pub fn of(item: &CatalogItem) -> Self {
        match item.bayesian_rating {
            Some(pair) => Self {
                source: RATING_SOURCE_BAYESIAN,
                value: pair.value,
                votes: pair.votes,
            },
            None => Self {
                source: RATING_SOURCE_RAW,
                value: item.rating.value,
                votes: item.rating.votes,
            },
        }
    }
}

/// True iff some country window is open at `now`:
/// `available_at <= now` and (`ends_at` absent or `now < ends_at`).
///
/// Pure; reusable standalone for property testing.
pub fn is_playable(item: &CatalogItem, now: DateTime<Utc>) -> bool {
    item.availability.values().any(|w| window_open(w, now))
}

fn window_open(window: &Window, now: DateTime<Utc>) -> bool {
    match window.available_at {
        Some(start) => start <= now && window.ends_at.is_none_or(|end| now < end),
        None => false,
    }
}
