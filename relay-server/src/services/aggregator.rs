//! Artist aggregation
//!
//! Resolves an artist name into one document:
//!
//! 1. **Searching** - best catalog match for the name
//! 2. **FetchingRelated** - related artists of that match
//! 3. **FetchingTracks** - top tracks of every related artist, all in flight at once
//!
//! Any failure ends the request; a partial document is never returned.
//!
//! Stage 3 spawns one task per related artist. Tasks report `(index, result)`
//! over a channel to the coordinating future, which alone owns the records and
//! the [`FanOutState`]. There is no cancellation: after a short-circuit the
//! remaining tasks finish on their own and their sends go nowhere.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::fan_out::{FanOutProgress, FanOutState};
use super::track_fetcher::TrackFetcher;
use crate::catalog::{CatalogApi, CatalogError};
use crate::models::{ArtistRecord, Track};

/// Aggregation stage, reported with failures and in logs
///
/// `Completed` and `Failed` are terminal. A failure is logged as `Failed`,
/// with [`ResolveError::stage`] naming the stage it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStage {
    Searching,
    FetchingRelated,
    FetchingTracks,
    Completed,
    Failed,
}

impl fmt::Display for AggregationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationStage::Searching => "searching",
            AggregationStage::FetchingRelated => "fetching_related",
            AggregationStage::FetchingTracks => "fetching_tracks",
            AggregationStage::Completed => "completed",
            AggregationStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why an artist could not be resolved
///
/// The HTTP layer collapses all of these into one 404; the variants exist
/// for logging.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("artist search failed: {0}")]
    Search(#[source] CatalogError),

    #[error("no artist matches {name:?}")]
    NoMatch { name: String },

    #[error("related artists lookup for {artist_id} failed: {source}")]
    Related {
        artist_id: String,
        #[source]
        source: CatalogError,
    },

    #[error("top tracks lookup for {artist_id} failed: {source}")]
    TopTracks {
        artist_id: String,
        #[source]
        source: CatalogError,
    },

    #[error("top tracks fan-out ended after {completed} of {total} lookups")]
    FanOutAborted { completed: usize, total: usize },
}

impl ResolveError {
    /// Stage the pipeline was in when it failed
    pub fn stage(&self) -> AggregationStage {
        match self {
            ResolveError::Search(_) | ResolveError::NoMatch { .. } => AggregationStage::Searching,
            ResolveError::Related { .. } => AggregationStage::FetchingRelated,
            ResolveError::TopTracks { .. } | ResolveError::FanOutAborted { .. } => {
                AggregationStage::FetchingTracks
            }
        }
    }
}

/// Drives the search → related → top-tracks pipeline for one artist name
///
/// Holds no per-request state; every call to [`resolve_artist`] builds its
/// own records and fan-out state, so one aggregator serves all requests.
///
/// [`resolve_artist`]: ArtistAggregator::resolve_artist
#[derive(Clone)]
pub struct ArtistAggregator {
    catalog: Arc<dyn CatalogApi>,
    tracks: TrackFetcher,
}

impl ArtistAggregator {
    pub fn new(catalog: Arc<dyn CatalogApi>, market: impl Into<String>) -> Self {
        let tracks = TrackFetcher::new(Arc::clone(&catalog), market);
        Self { catalog, tracks }
    }

    pub fn market(&self) -> &str {
        self.tracks.market()
    }

    /// Resolve `name` into the primary artist with related artists and their
    /// top tracks attached
    pub async fn resolve_artist(&self, name: &str) -> Result<ArtistRecord, ResolveError> {
        debug!(artist = %name, stage = %AggregationStage::Searching, "Resolving artist");
        let mut artist = self.search(name).await?;

        debug!(
            artist = %name,
            artist_id = %artist.id,
            stage = %AggregationStage::FetchingRelated,
            "Primary artist found"
        );
        let related = self
            .catalog
            .related_artists(&artist.id)
            .await
            .map_err(|source| ResolveError::Related {
                artist_id: artist.id.clone(),
                source,
            })?;

        let related = self.attach_top_tracks(related).await?;

        info!(
            artist = %name,
            artist_id = %artist.id,
            related_count = related.len(),
            stage = %AggregationStage::Completed,
            "Artist resolved"
        );
        artist.related = Some(related);
        Ok(artist)
    }

    async fn search(&self, name: &str) -> Result<ArtistRecord, ResolveError> {
        let matches = self
            .catalog
            .search_artists(name)
            .await
            .map_err(ResolveError::Search)?;

        matches
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NoMatch {
                name: name.to_string(),
            })
    }

    /// Fan out one top-tracks lookup per related artist and fan the results
    /// back in
    async fn attach_top_tracks(
        &self,
        mut related: Vec<ArtistRecord>,
    ) -> Result<Vec<ArtistRecord>, ResolveError> {
        let mut state = FanOutState::new(related.len());
        if state.is_complete() {
            return Ok(related);
        }

        debug!(
            total = state.total(),
            stage = %AggregationStage::FetchingTracks,
            "Fetching top tracks for related artists"
        );

        // Capacity N: no sender ever waits, even after the receiver is gone
        let (tx, mut rx) = mpsc::channel::<(usize, Result<Vec<Track>, CatalogError>)>(state.total());
        for (index, artist) in related.iter().enumerate() {
            let fetcher = self.tracks.clone();
            let tx = tx.clone();
            let artist_id = artist.id.clone();
            tokio::spawn(async move {
                let outcome = fetcher.top_tracks_for(&artist_id).await;
                // Receiver is gone once the request has settled
                let _ = tx.send((index, outcome)).await;
            });
        }
        drop(tx);

        while let Some((index, outcome)) = rx.recv().await {
            match outcome {
                Ok(tracks) => {
                    related[index].tracks = Some(tracks);
                    if state.record_success() == FanOutProgress::Completed {
                        return Ok(related);
                    }
                }
                Err(source) => {
                    state.record_failure();
                    debug!(
                        artist_id = %related[index].id,
                        completed = state.completed(),
                        total = state.total(),
                        "Top tracks lookup failed, abandoning remaining lookups"
                    );
                    return Err(ResolveError::TopTracks {
                        artist_id: related[index].id.clone(),
                        source,
                    });
                }
            }
        }

        // Every sender dropped without reporting: a fetch task panicked
        Err(ResolveError::FanOutAborted {
            completed: state.completed(),
            total: state.total(),
        })
    }
}
