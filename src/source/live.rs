//! Live catalog source
//!
//! Pages through the catalog's browse endpoint once per configured
//! country. The same film often appears in several countries; each
//! sighting is emitted as its own record carrying a single-country
//! window and the library merge collapses them by id.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::{FetchProgress, ProgressFn, RawRecord, RawWindow, SourceAdapter, SourceError};

const DEFAULT_PER_PAGE: u32 = 100;

/// Paged live-query source.
pub struct LiveSource {
    http_client: reqwest::Client,
    base_url: String,
    countries: Vec<String>,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    films: Vec<LiveFilm>,
    meta: PageMeta,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    next_page: Option<u32>,
}

/// A film row as the browse endpoint returns it. Only the window under
/// `consumable` differs from the snapshot shape; everything else maps
/// straight onto [`RawRecord`] fields.
#[derive(Debug, Deserialize)]
struct LiveFilm {
    #[serde(alias = "film_id", deserialize_with = "super::de_string_or_number")]
    id: String,
    title: String,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default, alias = "duration")]
    duration_minutes: Option<u32>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default, alias = "historic_countries")]
    countries: Vec<String>,
    #[serde(default)]
    directors: Vec<String>,
    #[serde(default, alias = "short_synopsis")]
    plot: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default, alias = "still_url")]
    artwork_url: Option<String>,
    #[serde(default, alias = "average_rating_out_of_ten")]
    rating_value: Option<f64>,
    #[serde(default, alias = "number_of_ratings")]
    rating_votes: Option<u64>,
    #[serde(default)]
    consumable: Option<RawWindow>,
}

impl LiveFilm {
    fn into_record(self, country: &str) -> RawRecord {
        let mut availability = HashMap::new();
        if let Some(window) = self.consumable {
            availability.insert(country.to_string(), window);
        }
        RawRecord {
            id: self.id,
            title: self.title,
            original_title: self.original_title,
            year: self.year,
            duration_minutes: self.duration_minutes,
            genres: self.genres,
            countries: self.countries,
            directors: self.directors,
            plot: self.plot,
            web_url: self.web_url,
            artwork_url: self.artwork_url,
            rating_value: self.rating_value,
            rating_votes: self.rating_votes,
            bayesian_rating: None,
            availability,
        }
    }
}

impl LiveSource {
    pub fn new(base_url: impl Into<String>, countries: Vec<String>) -> Self {
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
            http_client,
            base_url: base_url.into(),
            countries,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    async fn fetch_country(
        &self,
        country: &str,
        records: &mut Vec<RawRecord>,
        country_index: usize,
        progress: &mut ProgressFn<'_>,
    ) -> Result<(), SourceError> {
        let mut page = 1u32;
        loop {
            let url = format!(
                "{}/browse/films?country={}&page={page}&per_page={}&playable=true",
                self.base_url,
                urlencoding::encode(country),
                self.per_page,
            );

            let response = self
                .http_client
                .get(&url)
                .send()
                .await
                .map_err(|e| SourceError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Api(format!(
                    "HTTP {} for country {country} page {page}",
                    status
                )));
            }

            let body: PageResponse = response
                .json()
                .await
                .map_err(|e| SourceError::Parse(e.to_string()))?;

            records.extend(body.films.into_iter().map(|f| f.into_record(country)));

            progress(FetchProgress {
                current_items: records.len(),
                current_country: country_index + 1,
                total_countries: self.countries.len(),
                country: country.to_string(),
            });

            match body.meta.next_page {
                Some(next) => page = next,
                None => return Ok(()),
            }
        }
    }
}

#[async_trait]
impl SourceAdapter for LiveSource {
    async fn fetch(&self, mut progress: ProgressFn<'_>) -> Result<Vec<RawRecord>, SourceError> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        for (index, country) in self.countries.iter().enumerate() {
            tracing::info!("Fetching live catalog for {country}");
            let start = records.len();
            self.fetch_country(country, &mut records, index, &mut progress)
                .await?;
            let (new, duplicate) = tally_sightings(&mut seen, &records[start..]);
            tracing::info!(
                "{country}: {new} new films, {duplicate} already seen in other countries"
            );
        }
        tracing::info!("Live fetch complete: {} records", records.len());
        Ok(records)
    }
}

/// Count which of a country's sightings are first appearances vs ids
/// already seen under another country, updating `seen` as it goes.
fn tally_sightings(seen: &mut HashSet<String>, sightings: &[RawRecord]) -> (usize, usize) {
    let mut new = 0;
    let mut duplicate = 0;
    for record in sightings {
        if seen.insert(record.id.clone()) {
            new += 1;
        } else {
            duplicate += 1;
        }
    }
    (new, duplicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_response_parses_browse_shape() {
        let json = r#"{
            "films": [
                {
                    "film_id": 1,
                    "title": "One",
                    "consumable": {
                        "available_at": "2024-01-01T00:00:00Z",
                        "availability_ends_at": null,
                        "availability": "live"
                    }
                },
                {"id": 2, "title": "Two", "consumable": null}
            ],
            "meta": {"next_page": 2}
        }"#;

        let page: PageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.films.len(), 2);
        assert_eq!(page.meta.next_page, Some(2));
    }

    #[test]
    fn sighting_carries_exactly_its_country() {
        let film = LiveFilm {
            id: "1".to_string(),
            title: "One".to_string(),
            original_title: None,
            year: Some(2020),
            duration_minutes: None,
            genres: vec![],
            countries: vec![],
            directors: vec![],
            plot: None,
            web_url: None,
            artwork_url: None,
            rating_value: None,
            rating_votes: None,
            consumable: Some(RawWindow {
                available_at: Some("2024-01-01T00:00:00Z".to_string()),
                ends_at: None,
                status: "live".to_string(),
            }),
        };

        let record = film.into_record("FR");
        assert_eq!(record.availability.len(), 1);
        assert!(record.availability.contains_key("FR"));
    }

    #[test]
    fn sighting_tally_separates_new_from_repeats() {
        fn record(id: &str) -> RawRecord {
            serde_json::from_str(&format!(r#"{{"id": "{id}", "title": "X"}}"#)).unwrap()
        }

        let mut seen = HashSet::new();
        assert_eq!(
            tally_sightings(&mut seen, &[record("1"), record("2")]),
            (2, 0)
        );
        // Second country: one repeat sighting, one new film.
        assert_eq!(
            tally_sightings(&mut seen, &[record("2"), record("3")]),
            (1, 1)
        );
    }

    #[test]
    fn unplayable_sighting_has_no_window() {
        let film = LiveFilm {
            id: "2".to_string(),
            title: "Two".to_string(),
            original_title: None,
            year: None,
            duration_minutes: None,
            genres: vec![],
            countries: vec![],
            directors: vec![],
            plot: None,
            web_url: None,
            artwork_url: None,
            rating_value: None,
            rating_votes: None,
            consumable: None,
        };

        assert!(film.into_record("FR").availability.is_empty());
    }
}
