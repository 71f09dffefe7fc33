//! OMDb API Data Transfer Objects
//!
//! These types match what the OMDb API returns, PascalCase field names
//! included. OMDb reports "nothing found" as an HTTP 200 with
//! `"Response": "False"` - the adapter turns that into an empty
//! candidate list rather than an error.

use serde::{Deserialize, Serialize};

/// Response from `/?s=<title>` search requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<SearchMovie>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchMovie {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// "1999" for films, "2011-2019" style ranges for series
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

/// Response from `/?i=<imdbID>` detail requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetailsResponse {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}
