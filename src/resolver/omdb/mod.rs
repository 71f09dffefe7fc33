//! OMDb integration
//!
//! Secondary metadata provider. OMDb search hits already carry the IMDb
//! id, so the candidate id and the cross-reference id are the same
//! string. API docs: https://www.omdbapi.com/

mod adapter;
mod client;
pub mod dto;

pub use client::OmdbClient;
