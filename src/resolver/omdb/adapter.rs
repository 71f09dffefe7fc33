//! Adapter layer: convert OMDb DTOs to domain models

use super::dto;
use crate::resolver::domain::{Candidate, ResolutionResult, ResolverError};

/// A "False" search response means no match, which is not an error.
pub fn to_candidates(response: dto::SearchResponse) -> Vec<Candidate> {
    if response.response != "True" {
        return vec![];
    }

    response
        .search
        .into_iter()
        .map(|movie| Candidate {
            year: movie.year.as_deref().and_then(parse_year),
            id: movie.imdb_id,
        })
        .collect()
}

pub fn to_resolution(
    details: dto::DetailsResponse,
    provider: &str,
) -> Result<ResolutionResult, ResolverError> {
    if details.response != "True" {
        return Err(ResolverError::Api(
            details
                .error
                .unwrap_or_else(|| "details lookup failed".to_string()),
        ));
    }

    let imdb_url = details
        .imdb_id
        .as_deref()
        .map(|id| format!("https://www.imdb.com/title/{id}/"));

    Ok(ResolutionResult {
        provider: provider.to_string(),
        tmdb_id: None,
        imdb_id: details.imdb_id,
        imdb_url,
    })
}

/// OMDb years come as "1982" or range forms like "2011-2019"; the
/// leading year is what matters for fuzzy matching.
fn parse_year(year: &str) -> Option<i32> {
    year.chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn false_response_yields_no_candidates() {
        let response = dto::SearchResponse {
            search: vec![],
            response: "False".to_string(),
            error: Some("Movie not found!".to_string()),
        };
        assert!(to_candidates(response).is_empty());
    }

    #[test]
    fn year_ranges_use_leading_year() {
        assert_eq!(parse_year("1982"), Some(1982));
        assert_eq!(parse_year("2011-2019"), Some(2011));
        assert_eq!(parse_year("N/A"), None);
    }

    #[test]
    fn resolution_from_details() {
        let details = dto::DetailsResponse {
            imdb_id: Some("tt0083658".to_string()),
            response: "True".to_string(),
            error: None,
        };
        let result = to_resolution(details, "OMDb").unwrap();
        assert_eq!(result.imdb_id.as_deref(), Some("tt0083658"));
        assert_eq!(
            result.imdb_url.as_deref(),
            Some("https://www.imdb.com/title/tt0083658/")
        );
        assert!(result.tmdb_id.is_none());
    }
}
