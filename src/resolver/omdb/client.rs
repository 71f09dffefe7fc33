//! OMDb HTTP client
//!
//! OMDb signals "nothing found" inside an HTTP 200 body, so only real
//! transport problems and key rejections surface as errors here.

use super::{adapter, dto};
use crate::resolver::domain::{Candidate, ResolutionResult, ResolverError};

const PROVIDER_NAME: &str = "OMDb";

/// OMDb API client
pub struct OmdbClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl OmdbClient {
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
            base_url: "https://www.omdbapi.com".to_string(),
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

    /// Search by title, optionally constrained to a release year.
    pub async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Vec<Candidate>, ResolverError> {
        let mut url = format!(
            "{}/?apikey={}&s={}&type=movie",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(title),
        );
        if let Some(year) = year {
            url.push_str(&format!("&y={year}"));
        }

        match self.get_json::<dto::SearchResponse>(&url).await? {
            Some(response) => Ok(adapter::to_candidates(response)),
            None => Ok(vec![]),
        }
    }

    /// Fetch details for a candidate (an IMDb id for this provider).
    pub async fn details(&self, candidate_id: &str) -> Result<ResolutionResult, ResolverError> {
        let url = format!(
            "{}/?apikey={}&i={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(candidate_id),
        );

        let details: dto::DetailsResponse = self
            .get_json(&url)
            .await?
            .ok_or_else(|| ResolverError::Api(format!("record {candidate_id} not found")))?;
        adapter::to_resolution(details, PROVIDER_NAME)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OmdbClient::new("test-key");
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, "https://www.omdbapi.com");
        assert_eq!(client.name(), "OMDb");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = OmdbClient::with_base_url("key", "http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
