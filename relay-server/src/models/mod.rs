//! Data models for catalog responses and the aggregated artist document

pub mod artist;

pub use artist::{
    ArtistPage, ArtistRecord, RelatedArtistsResponse, SearchResponse, TopTracksResponse, Track,
};
