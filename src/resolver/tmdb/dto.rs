//! TMDB API Data Transfer Objects
//!
//! These types match what the TMDB v3 API returns. Do not use them
//! outside the tmdb module - convert to domain types in the adapter.
//!
//! Example search response:
//! ```json
//! {
//!   "page": 1,
//!   "results": [
//!     {"id": 603, "title": "The Matrix", "release_date": "1999-03-30"}
//!   ],
//!   "total_results": 1
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Response from `/3/search/movie`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchMovie>,
}

/// One search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchMovie {
    pub id: u64,
    pub title: Option<String>,
    /// "YYYY-MM-DD", may be empty or absent for unreleased titles
    pub release_date: Option<String>,
}

/// Response from `/3/movie/{id}?append_to_response=external_ids`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieDetails {
    pub id: u64,
    pub external_ids: Option<ExternalIds>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
}

/// Error body TMDB returns on non-2xx statuses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub status_code: i32,
    pub status_message: String,
}
