//! Artist search endpoint
//!
//! `GET /search/{name}` answers with the aggregated artist document, or a
//! bare 404 whatever went wrong upstream.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::models::ArtistRecord;
use crate::services::AggregationStage;
use crate::AppState;

/// GET /search/:name
pub async fn search_artist(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ArtistRecord>> {
    match state.aggregator.resolve_artist(&name).await {
        Ok(artist) => {
            info!(artist = %name, artist_id = %artist.id, "Search request served");
            Ok(Json(artist))
        }
        Err(err) => {
            warn!(
                artist = %name,
                stage = %AggregationStage::Failed,
                failed_in = %err.stage(),
                error = %err,
                "Search request failed"
            );
            Err(err.into())
        }
    }
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search/:name", get(search_artist))
}
