//! External identifier resolution
//!
//! Maps a title/year to external cross-reference identifiers via one or
//! more provider services. The algorithm lives in [`service`]; the
//! providers implement [`traits::MetadataProvider`]. Stateless per call,
//! network-bound, no shared cache. Which provider to try first (and
//! whether to retry a failed attempt against another one) is the
//! caller's policy.

pub mod domain;
pub mod omdb;
pub mod service;
pub mod tmdb;
pub mod traits;

pub use domain::{Candidate, ResolutionResult, ResolverError};
pub use omdb::OmdbClient;
pub use service::{ResolveRequest, resolve};
pub use tmdb::TmdbClient;
pub use traits::MetadataProvider;
