//! Aggregation services
//!
//! - `track_fetcher`: top tracks for one artist
//! - `fan_out`: completion counting for the parallel stage
//! - `aggregator`: the search → related → top-tracks pipeline

pub mod aggregator;
pub mod fan_out;
pub mod track_fetcher;

pub use aggregator::{AggregationStage, ArtistAggregator, ResolveError};
pub use fan_out::{FanOutProgress, FanOutState};
pub use track_fetcher::TrackFetcher;
