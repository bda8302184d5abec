//! Top-tracks lookup for a single artist

use std::sync::Arc;
use tracing::debug;

use crate::catalog::{CatalogApi, CatalogError};
use crate::models::{ArtistRecord, Track};

/// Fetches an artist's top tracks in a fixed market
#[derive(Clone)]
pub struct TrackFetcher {
    catalog: Arc<dyn CatalogApi>,
    market: String,
}

impl TrackFetcher {
    pub fn new(catalog: Arc<dyn CatalogApi>, market: impl Into<String>) -> Self {
        Self {
            catalog,
            market: market.into(),
        }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    /// Top tracks for `artist_id`, without touching any record
    ///
    /// Used by the parallel fan-out, where each task reports its own result
    /// back to the coordinator.
    pub async fn top_tracks_for(&self, artist_id: &str) -> Result<Vec<Track>, CatalogError> {
        let tracks = self.catalog.top_tracks(artist_id, &self.market).await?;
        debug!(
            artist_id = %artist_id,
            market = %self.market,
            track_count = tracks.len(),
            "Fetched top tracks"
        );
        Ok(tracks)
    }

    /// Fetch and attach top tracks to `artist`
    ///
    /// `artist.tracks` is only written on success; on failure it is left as
    /// it was. The aggregator's parallel stage does not call this: its tasks
    /// use [`top_tracks_for`](Self::top_tracks_for) and the coordinator
    /// attaches the tracks by index.
    pub async fn fetch_top_tracks(&self, artist: &mut ArtistRecord) -> Result<(), CatalogError> {
        let tracks = self.top_tracks_for(&artist.id).await?;
        artist.tracks = Some(tracks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Answers top-tracks requests for "ok" and fails everything else
    #[derive(Default)]
    struct StubCatalog {
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    #[async_trait]
    impl CatalogApi for StubCatalog {
        async fn fetch(
            &self,
            endpoint: &str,
            query: &[(&str, &str)],
        ) -> Result<Value, CatalogError> {
            self.seen.lock().unwrap().push((
                endpoint.to_string(),
                query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            if endpoint == "artists/ok/top-tracks" {
                Ok(json!({"tracks": [{"id": "t1"}, {"id": "t2"}]}))
            } else {
                Err(CatalogError::Api {
                    status: 502,
                    body: "bad gateway".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_success_attaches_tracks() {
        let catalog = Arc::new(StubCatalog::default());
        let fetcher = TrackFetcher::new(catalog.clone(), "US");
        let mut artist = ArtistRecord::new("ok", "Works");

        fetcher.fetch_top_tracks(&mut artist).await.unwrap();

        let tracks = artist.tracks.expect("tracks attached");
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0]["id"], "t1");
    }

    #[tokio::test]
    async fn test_request_is_scoped_to_market() {
        let catalog = Arc::new(StubCatalog::default());
        let fetcher = TrackFetcher::new(catalog.clone(), "FR");

        fetcher.top_tracks_for("ok").await.unwrap();

        let seen = catalog.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "artists/ok/top-tracks");
        assert_eq!(seen[0].1, vec![("country".to_string(), "FR".to_string())]);
    }

    #[tokio::test]
    async fn test_failure_leaves_tracks_absent() {
        let catalog = Arc::new(StubCatalog::default());
        let fetcher = TrackFetcher::new(catalog, "US");
        let mut artist = ArtistRecord::new("broken", "Fails");

        let err = fetcher.fetch_top_tracks(&mut artist).await.unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(artist.tracks.is_none());
    }
}
