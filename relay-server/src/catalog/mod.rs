//! Catalog API access
//!
//! [`CatalogApi::fetch`] is the single-request primitive: one GET, one parsed
//! body or one error. The typed lookups the aggregator needs are provided
//! methods layered on top of it, so any implementation of `fetch` (the HTTP
//! client, or a scripted catalog in tests) gets them for free.

pub mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::{ArtistRecord, RelatedArtistsResponse, SearchResponse, TopTracksResponse, Track};

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// HTTP status reported by the catalog, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Search endpoint path
pub const SEARCH_ENDPOINT: &str = "search";

/// Only the best match is used
pub const SEARCH_LIMIT: u32 = 1;

/// Related-artists endpoint path for an artist
///
/// The id is percent-encoded so it always stays a single path segment.
pub fn related_artists_endpoint(artist_id: &str) -> String {
    format!("artists/{}/related-artists", urlencoding::encode(artist_id))
}

/// Top-tracks endpoint path for an artist
pub fn top_tracks_endpoint(artist_id: &str) -> String {
    format!("artists/{}/top-tracks", urlencoding::encode(artist_id))
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, CatalogError> {
    serde_json::from_value(body)
        .map_err(|e| CatalogError::Parse(format!("Unexpected {} response shape: {}", endpoint, e)))
}

/// Access to the music catalog
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Issue one GET against `endpoint` (relative to the catalog base URL)
    /// with `query` URL-encoded, returning the parsed JSON body.
    ///
    /// No retries and no caching: each call is exactly one upstream request.
    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, CatalogError>;

    /// Search artists by name, best match first
    async fn search_artists(&self, name: &str) -> Result<Vec<ArtistRecord>, CatalogError> {
        let limit = SEARCH_LIMIT.to_string();
        let body = self
            .fetch(
                SEARCH_ENDPOINT,
                &[("q", name), ("limit", limit.as_str()), ("type", "artist")],
            )
            .await?;
        let page: SearchResponse = decode(SEARCH_ENDPOINT, body)?;
        Ok(page.artists.items)
    }

    /// Artists the catalog considers related to `artist_id`
    async fn related_artists(&self, artist_id: &str) -> Result<Vec<ArtistRecord>, CatalogError> {
        let endpoint = related_artists_endpoint(artist_id);
        let body = self.fetch(&endpoint, &[]).await?;
        let related: RelatedArtistsResponse = decode(&endpoint, body)?;
        Ok(related.artists)
    }

    /// Top tracks of `artist_id` in `market`
    async fn top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<Track>, CatalogError> {
        let endpoint = top_tracks_endpoint(artist_id);
        let body = self.fetch(&endpoint, &[("country", market)]).await?;
        let top: TopTracksResponse = decode(&endpoint, body)?;
        Ok(top.tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_pass_through_unchanged() {
        assert_eq!(
            related_artists_endpoint("4tZwfgrHOc3mvqYlEYSvVi"),
            "artists/4tZwfgrHOc3mvqYlEYSvVi/related-artists"
        );
        assert_eq!(top_tracks_endpoint("X"), "artists/X/top-tracks");
    }

    #[test]
    fn test_reserved_characters_in_id_are_escaped() {
        assert_eq!(
            related_artists_endpoint("a/b?c#d"),
            "artists/a%2Fb%3Fc%23d/related-artists"
        );
        assert_eq!(top_tracks_endpoint("x y"), "artists/x%20y/top-tracks");
    }
}
