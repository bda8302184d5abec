//! Catalog artist records and response envelopes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A top track, attached verbatim from the catalog response
pub type Track = Value;

/// Catalog artist, enriched in place as the aggregation advances
///
/// Fields the relay does not inspect (genres, images, popularity, ...) are
/// kept in `catalog_fields` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArtistRecord {
    /// Catalog artist ID
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Related artists, set once the related-artists lookup succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<ArtistRecord>>,
    /// Top tracks, set once this artist's top-tracks lookup succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
    /// Remaining catalog fields
    #[serde(flatten)]
    pub catalog_fields: Map<String, Value>,
}

impl ArtistRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            related: None,
            tracks: None,
            catalog_fields: Map::new(),
        }
    }
}

/// `GET search?type=artist` body
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub artists: ArtistPage,
}

/// Paged artist list inside a search response
#[derive(Debug, Deserialize)]
pub struct ArtistPage {
    #[serde(default)]
    pub items: Vec<ArtistRecord>,
}

/// `GET artists/{id}/related-artists` body
#[derive(Debug, Deserialize)]
pub struct RelatedArtistsResponse {
    #[serde(default)]
    pub artists: Vec<ArtistRecord>,
}

/// `GET artists/{id}/top-tracks` body
#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}
