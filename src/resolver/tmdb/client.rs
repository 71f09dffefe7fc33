//! TMDB HTTP client
//!
//! Handles communication with the TMDB v3 API. Search results come back
//! in TMDB relevance order, which the fuzzy matcher relies on for tie
//! breaking.

use super::{adapter, dto};
use crate::resolver::domain::{Candidate, ResolutionResult, ResolverError};

const PROVIDER_NAME: &str = "TMDB";

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl TmdbClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http_client,
            base_url: "https://api.themoviedb.org/3".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn name(&self) -> &str {
        PROVIDER_NAME
    }

    /// Search for a movie by title, optionally filtered by release year.
    pub async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Vec<Candidate>, ResolverError> {
        let mut url = format!(
            "{}/search/movie?api_key={}&query={}&include_adult=false&page=1",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(title),
        );
        if let Some(year) = year {
            url.push_str(&format!("&year={year}"));
        }

        match self.get_json::<dto::SearchResponse>(&url).await? {
            Some(response) => Ok(adapter::to_candidates(response)),
            None => Ok(vec![]),
        }
    }

    /// Fetch external ids for a movie. `external_ids` rides along on the
    /// details request via append_to_response, saving a round trip.
    pub async fn details(&self, candidate_id: &str) -> Result<ResolutionResult, ResolverError> {
        let url = format!(
            "{}/movie/{}?api_key={}&append_to_response=external_ids",
            self.base_url,
            urlencoding::encode(candidate_id),
            urlencoding::encode(&self.api_key),
        );

        let details: dto::MovieDetails = self
            .get_json(&url)
            .await?
            .ok_or_else(|| ResolverError::Api(format!("movie {candidate_id} not found")))?;
        Ok(adapter::to_resolution(details, PROVIDER_NAME))
    }

    /// GET and deserialize. A 404 body comes back as `None`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, ResolverError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolverError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ResolverError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(ResolverError::Api(error.status_message));
            }
            return Err(ResolverError::Api(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| ResolverError::Parse(e.to_string()))
    }
}
