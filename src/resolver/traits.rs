//! Trait definition for metadata providers.
//!
//! The resolution algorithm runs against this trait so tests can
//! substitute scripted mock providers for the real TMDB/OMDb clients.

use async_trait::async_trait;

use super::domain::{Candidate, ResolutionResult, ResolverError};

/// Capability contract for an external metadata provider.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Human-readable provider name, recorded on resolution results.
    fn name(&self) -> &str;

    /// Search for a title. When `year` is given the provider applies it
    /// as a strict server-side filter; without it the full result list
    /// comes back in provider order for client-side fuzzy matching.
    ///
    /// An empty list means nothing matched - that is not an error.
    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Vec<Candidate>, ResolverError>;

    /// Fetch cross-reference identifiers for a search candidate.
    async fn details(&self, candidate_id: &str) -> Result<ResolutionResult, ResolverError>;
}

#[async_trait]
impl MetadataProvider for super::tmdb::TmdbClient {
    fn name(&self) -> &str {
        self.name()
    }

    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Vec<Candidate>, ResolverError> {
        self.search(title, year).await
    }

    async fn details(&self, candidate_id: &str) -> Result<ResolutionResult, ResolverError> {
        self.details(candidate_id).await
    }
}

#[async_trait]
impl MetadataProvider for super::omdb::OmdbClient {
    fn name(&self) -> &str {
        self.name()
    }

    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<Vec<Candidate>, ResolverError> {
        self.search(title, year).await
    }

    async fn details(&self, candidate_id: &str) -> Result<ResolutionResult, ResolverError> {
        self.details(candidate_id).await
    }
}
