//! Song catalog client for Encore
//!
//! This crate talks to the external song-search endpoint: listing candidates
//! for a free-text query, and fetching full metadata for the Nth match so a
//! music card can be rendered from it.

mod client;
mod models;

pub use client::CatalogClient;
pub use models::{SearchResult, TrackDetail};

/// Status code the API uses to mark a successful detail response.
pub const CATALOG_SUCCESS_CODE: i64 = 200;

/// Error types for catalog operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("catalog returned error code {code}")]
    Status { code: i64 },
}

/// Result type for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
