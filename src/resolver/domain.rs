//! Internal domain models for external identifier resolution.
//!
//! Provider API responses get converted into these types via adapters so
//! the resolution algorithm never sees wire formats.

/// One search hit from a provider, in the provider's result order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Provider-scoped identifier, stringly typed for uniform handling.
    pub id: String,
    /// Release year parsed from the candidate's own release date.
    pub year: Option<i32>,
}

/// Cross-reference identifiers for one resolved item.
///
/// Produced per resolution attempt and used only by the caller that
/// requested it; there is no shared cache. Identifier fields are strings
/// so every downstream consumer handles them uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// Name of the provider that produced the match.
    pub provider: String,
    pub tmdb_id: Option<String>,
    pub imdb_id: Option<String>,
    pub imdb_url: Option<String>,
}

/// Errors produced while talking to a metadata provider.
///
/// Any of these is a hard failure for the attempt; "nothing matched" is
/// not an error and is reported as an empty candidate list / `None`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolverError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider rejected request: {0}")]
    Api(String),

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("rate limited - try again later")]
    RateLimited,
}
