//! On-disk descriptor documents consumed by the host media indexer.
//!
//! One JSON descriptor per item, written atomically (temp file + rename)
//! and kept idempotently up to date: [`needs_rewrite`] compares the
//! item's effective rating against what the descriptor currently records
//! so repeated passes over an unchanged item perform zero disk writes.

mod name;

pub use name::sanitized_dir_name;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::catalog::{CatalogItem, EffectiveRating};
use crate::resolver::ResolutionResult;

/// Identifier type for the catalog's own id; exactly one unique-id entry
/// carries it and is marked default.
pub const ID_TYPE_CATALOG: &str = "kinosync";
pub const ID_TYPE_IMDB: &str = "imdb";
pub const ID_TYPE_TMDB: &str = "tmdb";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub name: String,
    pub value: f64,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueId {
    pub id_type: String,
    pub value: String,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryAvailability {
    pub country: String,
    pub available_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// The persisted metadata document for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub plot: Option<String>,
    /// Catalog page for the item, for host UIs that surface it.
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub ratings: Vec<RatingEntry>,
    #[serde(default)]
    pub unique_ids: Vec<UniqueId>,
    #[serde(default)]
    pub availability: Vec<CountryAvailability>,
}

impl Descriptor {
    /// Build the descriptor for an item, embedding resolved external
    /// identifiers when the resolver produced any.
    pub fn from_item(item: &CatalogItem, resolution: Option<&ResolutionResult>) -> Self {
        let effective = EffectiveRating::of(item);

        let mut unique_ids = vec![UniqueId {
            id_type: ID_TYPE_CATALOG.to_string(),
            value: item.id.clone(),
            default: true,
        }];
        if let Some(resolution) = resolution {
            if let Some(imdb_id) = &resolution.imdb_id {
                unique_ids.push(UniqueId {
                    id_type: ID_TYPE_IMDB.to_string(),
                    value: imdb_id.clone(),
                    default: false,
                });
            }
            if let Some(tmdb_id) = &resolution.tmdb_id {
                unique_ids.push(UniqueId {
                    id_type: ID_TYPE_TMDB.to_string(),
                    value: tmdb_id.clone(),
                    default: false,
                });
            }
        }

        let mut availability: Vec<CountryAvailability> = item
            .availability
            .iter()
            .map(|(country, window)| CountryAvailability {
                country: country.clone(),
                available_at: window.available_at,
                ends_at: window.ends_at,
            })
            .collect();
        availability.sort_by(|a, b| a.country.cmp(&b.country));

        Self {
            title: item.title.clone(),
            original_title: item.original_title.clone(),
            year: item.year,
            plot: item.plot.clone(),
            web_url: item.web_url.clone(),
            genres: item.genres.clone(),
            directors: item.directors.clone(),
            runtime_minutes: item.duration_minutes,
            ratings: vec![RatingEntry {
                name: effective.source.to_string(),
                value: effective.value,
                votes: effective.votes,
            }],
            unique_ids,
            availability,
        }
    }
}

/// Decide whether the descriptor on disk must be rewritten for `item`.
///
/// Absence always rewrites. Otherwise the item's effective rating triple
/// `{source_name, value, votes}` must match a recorded rating entry
/// exactly - a vote-count-only change still forces a rewrite.
pub fn needs_rewrite(existing: Option<&Descriptor>, item: &CatalogItem) -> bool {
    let Some(descriptor) = existing else {
        return true;
    };
    let effective = EffectiveRating::of(item);
    !descriptor.ratings.iter().any(|r| {
        r.name == effective.source && r.value == effective.value && r.votes == effective.votes
    })
}

/// Descriptor I/O errors
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Failed to read descriptor {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to serialize descriptor: {0}")]
    Serialize(serde_json::Error),

    #[error("Failed to write descriptor to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

/// Load a descriptor if one exists.
///
/// A missing file is `None`. A file that no longer parses is also
/// treated as absent (with a warning) so the next write repairs it.
pub fn load(path: &Path) -> Result<Option<Descriptor>, DescriptorError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(path).map_err(|e| DescriptorError::Read(path.to_path_buf(), e))?;
    match serde_json::from_str(&contents) {
        Ok(descriptor) => Ok(Some(descriptor)),
        Err(e) => {
            tracing::warn!("Unparseable descriptor {:?}, will rewrite: {}", path, e);
            Ok(None)
        }
    }
}

/// Write a descriptor atomically (write to temp, then rename).
pub fn write(path: &Path, descriptor: &Descriptor) -> Result<(), DescriptorError> {
    let contents = serde_json::to_string_pretty(descriptor).map_err(DescriptorError::Serialize)?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, &contents)
        .map_err(|e| DescriptorError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| DescriptorError::Rename(temp_path, path.to_path_buf(), e))?;
    Ok(())
}

/// Write the playback pointer file next to the descriptor: a one-line
/// URL the host player resolves back through the plugin.
pub fn write_pointer(path: &Path, base_url: &str, item_id: &str) -> Result<(), DescriptorError> {
    let url = format!(
        "{base_url}?action=play&item_id={}",
        urlencoding::encode(item_id)
    );
    std::fs::write(path, url).map_err(|e| DescriptorError::Write(path.to_path_buf(), e))
}
