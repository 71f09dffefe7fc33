//! TMDB (The Movie Database) integration
//!
//! Primary metadata provider: returns both a TMDB id and an IMDb id, and
//! its search endpoint reports per-candidate release dates, which the
//! fuzzy year filter needs.
//! API docs: https://developer.themoviedb.org/reference/search-movie

mod adapter;
mod client;
pub mod dto;

pub use client::TmdbClient;
