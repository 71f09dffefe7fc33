//! Source adapters: produce raw catalog records for ingestion.
//!
//! Two variants compose behind one contract: a paged live-query adapter
//! (per-country fetch with progress reporting) and a snapshot adapter
//! (integrity-checked compressed blob). Both yield [`RawRecord`]s whose
//! field names are normalized from the source's wire vocabulary; the
//! records are converted to [`CatalogItem`]s here and merged by the
//! [`Library`](crate::catalog::Library).

pub mod live;
pub mod snapshot;

pub use live::LiveSource;
pub use snapshot::SnapshotSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::catalog::{CatalogItem, RatingPair, Window};

/// Ingestion progress, reported as countries and items accumulate.
#[derive(Debug, Clone)]
pub struct FetchProgress {
    pub current_items: usize,
    pub current_country: usize,
    pub total_countries: usize,
    pub country: String,
}

/// Callback invoked by adapters as fetching progresses.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(FetchProgress) + Send);

/// Contract for anything that can produce raw catalog records.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, progress: ProgressFn<'_>) -> Result<Vec<RawRecord>, SourceError>;
}

/// Errors raised while producing records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("source rejected request: {0}")]
    Api(String),

    /// Fatal for the ingestion pass; no partial catalog is accepted.
    #[error("snapshot integrity mismatch: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("failed to decompress snapshot: {0}")]
    Decompress(String),

    #[error("failed to parse source data: {0}")]
    Parse(String),
}

/// Per-country window as the sources report it: stringly-typed
/// timestamps and a free-text availability label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWindow {
    pub available_at: Option<String>,
    #[serde(alias = "availability_ends_at", alias = "expires_at")]
    pub ends_at: Option<String>,
    #[serde(default, alias = "availability")]
    pub status: String,
}

impl RawWindow {
    /// Parse into a typed window. Timestamps that fail to parse are
    /// dropped to `None` with a warning rather than failing ingestion.
    pub fn into_window(self) -> Window {
        Window {
            available_at: parse_timestamp(self.available_at.as_deref()),
            ends_at: parse_timestamp(self.ends_at.as_deref()),
            status: self.status,
        }
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Dropping unparseable window timestamp {:?}: {}", raw, e);
            None
        }
    }
}

/// A rating pair as sources report it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawRating {
    #[serde(alias = "score_over_10")]
    pub value: f64,
    #[serde(alias = "voters")]
    pub votes: u64,
}

/// One raw sighting of an item, minimally `{id, title, per-country
/// availability}` plus whatever descriptive fields the source carries.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "film_id", deserialize_with = "de_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, alias = "originaltitle")]
    pub original_title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, alias = "duration")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, alias = "historic_countries")]
    pub countries: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default, alias = "short_synopsis")]
    pub plot: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default, alias = "still_url")]
    pub artwork_url: Option<String>,
    #[serde(default, alias = "average_rating_out_of_ten")]
    pub rating_value: Option<f64>,
    #[serde(default, alias = "number_of_ratings")]
    pub rating_votes: Option<u64>,
    #[serde(default)]
    pub bayesian_rating: Option<RawRating>,
    #[serde(default, alias = "available_countries")]
    pub availability: HashMap<String, RawWindow>,
}

impl RawRecord {
    /// Convert to the canonical item model.
    pub fn into_item(self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            title: self.title,
            original_title: self.original_title,
            year: self.year,
            duration_minutes: self.duration_minutes,
            genres: self.genres,
            countries: self.countries,
            directors: self.directors,
            plot: self.plot,
            web_url: self.web_url,
            artwork_url: self.artwork_url,
            rating: RatingPair {
                value: self.rating_value.unwrap_or(0.0),
                votes: self.rating_votes.unwrap_or(0),
            },
            bayesian_rating: self.bayesian_rating.map(|r| RatingPair {
                value: r.value,
                votes: r.votes,
            }),
            availability: self
                .availability
                .into_iter()
                .map(|(country, window)| (country, window.into_window()))
                .collect(),
        }
    }
}

/// Sources are inconsistent about whether ids are JSON numbers or
/// strings; normalize both to strings.
fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
