//! Adapter layer: convert TMDB DTOs to domain models
//!
//! The only place TMDB wire types become domain types. TMDB numeric ids
//! are rendered as strings here for uniform identifier handling.

use super::dto;
use crate::resolver::domain::{Candidate, ResolutionResult};

pub fn to_candidates(response: dto::SearchResponse) -> Vec<Candidate> {
    response
        .results
        .into_iter()
        .map(|movie| Candidate {
            id: movie.id.to_string(),
            year: movie.release_date.as_deref().and_then(parse_release_year),
        })
        .collect()
}

pub fn to_resolution(details: dto::MovieDetails, provider: &str) -> ResolutionResult {
    let imdb_id = details
        .external_ids
        .and_then(|ids| ids.imdb_id)
        .filter(|id| !id.is_empty());
    let imdb_url = imdb_id
        .as_deref()
        .map(|id| format!("https://www.imdb.com/title/{id}/"));

    ResolutionResult {
        provider: provider.to_string(),
        tmdb_id: Some(details.id.to_string()),
        imdb_id,
        imdb_url,
    }
}

/// Parse the year prefix of a "YYYY-MM-DD" release date.
fn parse_release_year(date: &str) -> Option<i32> {
    date.split('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_carry_parsed_years() {
        let response = dto::SearchResponse {
            results: vec![
                dto::SearchMovie {
                    id: 603,
                    title: Some("The Matrix".to_string()),
                    release_date: Some("1999-03-30".to_string()),
                },
                dto::SearchMovie {
                    id: 604,
                    title: None,
                    release_date: Some("".to_string()),
                },
                dto::SearchMovie {
                    id: 605,
                    title: None,
                    release_date: None,
                },
            ],
        };

        let candidates = to_candidates(response);
        assert_eq!(candidates[0].id, "603");
        assert_eq!(candidates[0].year, Some(1999));
        assert_eq!(candidates[1].year, None);
        assert_eq!(candidates[2].year, None);
    }

    #[test]
    fn resolution_builds_imdb_url() {
        let details = dto::MovieDetails {
            id: 603,
            external_ids: Some(dto::ExternalIds {
                imdb_id: Some("tt0133093".to_string()),
            }),
        };
        let result = to_resolution(details, "TMDB");
        assert_eq!(result.tmdb_id.as_deref(), Some("603"));
        assert_eq!(result.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(
            result.imdb_url.as_deref(),
            Some("https://www.imdb.com/title/tt0133093/")
        );
    }

    #[test]
    fn resolution_without_imdb_id_still_succeeds() {
        let details = dto::MovieDetails {
            id: 42,
            external_ids: None,
        };
        let result = to_resolution(details, "TMDB");
        assert_eq!(result.tmdb_id.as_deref(), Some("42"));
        assert!(result.imdb_id.is_none());
        assert!(result.imdb_url.is_none());
    }
}
