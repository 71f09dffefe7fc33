//! The resolution algorithm: an ordered list of search strategies
//! evaluated lazily against one provider, short-circuiting on the first
//! candidate.
//!
//! Order for an item with a target year:
//! 1. strict search (title + year)
//! 2. fuzzy search (title only), candidates filtered to within one year
//!    of the target, smallest distance wins, ties by result order
//! 3.-4. the same pair again with the alternate/original title, when it
//!    differs from the primary title
//!
//! All strategies missing is a no-match, not an error. A transport
//! failure at any step aborts the whole resolution; retrying against a
//! secondary provider is the caller's policy.

use tracing::debug;

use super::domain::{Candidate, ResolutionResult, ResolverError};
use super::traits::MetadataProvider;

/// What the caller knows about the item being resolved.
#[derive(Debug, Clone)]
pub struct ResolveRequest<'a> {
    pub title: &'a str,
    pub original_title: Option<&'a str>,
    pub year: Option<i32>,
}

#[derive(Debug)]
enum Strategy<'a> {
    Strict { title: &'a str, year: i32 },
    Fuzzy { title: &'a str, target_year: i32 },
    /// Degenerate case when the caller has no target year: a single
    /// title-only search taking the first hit.
    TitleOnly { title: &'a str },
}

/// Resolve external identifiers for one item.
///
/// `Ok(None)` means every strategy came back empty; `Err` means a
/// provider call failed in transit.
pub async fn resolve(
    provider: &dyn MetadataProvider,
    request: &ResolveRequest<'_>,
) -> Result<Option<ResolutionResult>, ResolverError> {
    for strategy in strategies(request) {
        if let Some(candidate) = run_strategy(provider, &strategy).await? {
            debug!(
                provider = provider.name(),
                candidate = %candidate.id,
                ?strategy,
                "resolution candidate accepted"
            );
            return provider.details(&candidate.id).await.map(Some);
        }
    }

    debug!(
        provider = provider.name(),
        title = request.title,
        "no candidate from any strategy"
    );
    Ok(None)
}

fn strategies<'a>(request: &ResolveRequest<'a>) -> Vec<Strategy<'a>> {
    let mut titles = vec![request.title];
    if let Some(alt) = request.original_title
        && !alt.trim().eq_ignore_ascii_case(request.title.trim())
    {
        titles.push(alt);
    }

    titles
        .into_iter()
        .flat_map(|title| match request.year {
            Some(year) => vec![
                Strategy::Strict { title, year },
                Strategy::Fuzzy {
                    title,
                    target_year: year,
                },
            ],
            None => vec![Strategy::TitleOnly { title }],
        })
        .collect()
}

async fn run_strategy(
    provider: &dyn MetadataProvider,
    strategy: &Strategy<'_>,
) -> Result<Option<Candidate>, ResolverError> {
    match strategy {
        Strategy::Strict { title, year } => {
            let candidates = provider.search(title, Some(*year)).await?;
            Ok(candidates.into_iter().next())
        }
        Strategy::Fuzzy { title, target_year } => {
            let candidates = provider.search(title, None).await?;
            Ok(best_fuzzy_match(&candidates, *target_year))
        }
        Strategy::TitleOnly { title } => {
            let candidates = provider.search(title, None).await?;
            Ok(candidates.into_iter().next())
        }
    }
}

/// Accept candidates within one year of the target; among those pick the
/// smallest year distance, breaking ties by original result order.
fn best_fuzzy_match(candidates: &[Candidate], target_year: i32) -> Option<Candidate> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, c)| {
            let year = c.year?;
            let distance = (year - target_year).abs();
            (distance <= 1).then_some((distance, index, c))
        })
        .min_by_key(|(distance, index, _)| (*distance, *index))
        .map(|(_, _, c)| c.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::traits::mocks::MockProvider;

    fn candidate(id: &str, year: Option<i32>) -> Candidate {
        Candidate {
            id: id.to_string(),
            year,
        }
    }

    #[tokio::test]
    async fn strict_hit_short_circuits() {
        let provider = MockProvider::new().on_search(
            "Solaris",
            Some(1972),
            Ok(vec![candidate("101", Some(1972)), candidate("102", Some(1973))]),
        );
        let request = ResolveRequest {
            title: "Solaris",
            original_title: Some("Солярис"),
            year: Some(1972),
        };

        let result = resolve(&provider, &request).await.unwrap().unwrap();
        assert_eq!(result.tmdb_id.as_deref(), Some("101"));
        assert_eq!(
            provider.call_log(),
            vec!["search:Solaris@1972", "details:101"]
        );
    }

    #[tokio::test]
    async fn fuzzy_hit_skips_original_title_fallback() {
        // Strict search empty; fuzzy has one candidate within a year of
        // the target. It must be returned without ever trying the
        // original title.
        let provider = MockProvider::new()
            .on_search("Playtime", Some(1967), Ok(vec![]))
            .on_search(
                "Playtime",
                None,
                Ok(vec![
                    candidate("7", Some(1955)),
                    candidate("8", Some(1968)),
                ]),
            );
        let request = ResolveRequest {
            title: "Playtime",
            original_title: Some("Play Time"),
            year: Some(1967),
        };

        let result = resolve(&provider, &request).await.unwrap().unwrap();
        assert_eq!(result.tmdb_id.as_deref(), Some("8"));
        let log = provider.call_log();
        assert_eq!(log, vec!["search:Playtime@1967", "search:Playtime", "details:8"]);
        assert!(!log.iter().any(|c| c.contains("Play Time")));
    }

    #[tokio::test]
    async fn fuzzy_prefers_smallest_distance_then_order() {
        // Two candidates at distance 1 and one at distance 0; the
        // distance-0 hit wins even though it comes later.
        assert_eq!(
            best_fuzzy_match(
                &[
                    candidate("a", Some(1999)),
                    candidate("b", Some(2001)),
                    candidate("c", Some(2000)),
                ],
                2000,
            ),
            Some(candidate("c", Some(2000)))
        );
        // Equal distances: original order breaks the tie.
        assert_eq!(
            best_fuzzy_match(
                &[candidate("a", Some(1999)), candidate("b", Some(2001))],
                2000,
            ),
            Some(candidate("a", Some(1999)))
        );
        // Outside the +-1 tolerance, or no parseable year: rejected.
        assert_eq!(
            best_fuzzy_match(
                &[candidate("a", Some(1997)), candidate("b", None)],
                2000,
            ),
            None
        );
    }

    #[tokio::test]
    async fn falls_back_to_original_title() {
        let provider = MockProvider::new()
            .on_search("The Leopard", Some(1963), Ok(vec![]))
            .on_search("The Leopard", None, Ok(vec![]))
            .on_search(
                "Il Gattopardo",
                Some(1963),
                Ok(vec![candidate("55", Some(1963))]),
            );
        let request = ResolveRequest {
            title: "The Leopard",
            original_title: Some("Il Gattopardo"),
            year: Some(1963),
        };

        let result = resolve(&provider, &request).await.unwrap().unwrap();
        assert_eq!(result.tmdb_id.as_deref(), Some("55"));
    }

    #[tokio::test]
    async fn all_attempts_missing_is_not_an_error() {
        let provider = MockProvider::new();
        let request = ResolveRequest {
            title: "Nowhere",
            original_title: None,
            year: Some(2001),
        };
        assert!(resolve(&provider, &request).await.unwrap().is_none());
        // Identical original title adds no extra attempts
        assert_eq!(provider.call_log().len(), 2);
    }

    #[tokio::test]
    async fn identical_original_title_is_not_retried() {
        let provider = MockProvider::new();
        let request = ResolveRequest {
            title: "Same Title",
            original_title: Some("same title"),
            year: Some(2001),
        };
        resolve(&provider, &request).await.unwrap();
        assert_eq!(
            provider.call_log(),
            vec!["search:Same Title@2001", "search:Same Title"]
        );
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let provider = MockProvider::new().on_search(
            "Stalker",
            Some(1979),
            Err(ResolverError::Network("connection reset".to_string())),
        );
        let request = ResolveRequest {
            title: "Stalker",
            original_title: None,
            year: Some(1979),
        };
        assert!(matches!(
            resolve(&provider, &request).await,
            Err(ResolverError::Network(_))
        ));
    }

    #[tokio::test]
    async fn no_target_year_does_single_title_search() {
        let provider = MockProvider::new().on_search(
            "Untitled",
            None,
            Ok(vec![candidate("9", None)]),
        );
        let request = ResolveRequest {
            title: "Untitled",
            original_title: None,
            year: None,
        };
        let result = resolve(&provider, &request).await.unwrap().unwrap();
        assert_eq!(result.tmdb_id.as_deref(), Some("9"));
        assert_eq!(provider.call_log(), vec!["search:Untitled", "details:9"]);
    }
}
