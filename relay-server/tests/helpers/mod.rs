//! Shared test helpers: a scripted catalog and fixture builders
#![allow(dead_code)]

use async_trait::async_trait;
use relay_server::catalog::{CatalogApi, CatalogError};
use relay_server::services::ArtistAggregator;
use relay_server::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted endpoint answers
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    /// The lookup panics instead of answering
    Panic,
}

#[derive(Debug, Clone)]
struct Scripted {
    reply: Reply,
    delay: Duration,
}

/// One recorded catalog request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: String,
    pub query: Vec<(String, String)>,
}

/// In-memory catalog answering from a fixed script
///
/// Endpoints not in the script answer 404. `finished()` counts requests
/// that ran to completion, including ones whose result nobody waited for.
#[derive(Default)]
pub struct ScriptedCatalog {
    routes: HashMap<String, Scripted>,
    calls: Mutex<Vec<Call>>,
    finished: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, endpoint: &str, reply: Reply) -> Self {
        self.on_delayed(endpoint, reply, Duration::ZERO)
    }

    pub fn on_delayed(mut self, endpoint: &str, reply: Reply, delay: Duration) -> Self {
        self.routes
            .insert(endpoint.to_string(), Scripted { reply, delay });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, CatalogError> {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let scripted = self.routes.get(endpoint).cloned().unwrap_or(Scripted {
            reply: Reply::Status(404),
            delay: Duration::ZERO,
        });

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);

        match scripted.reply {
            Reply::Json(body) => Ok(body),
            Reply::Status(status) => Err(CatalogError::Api {
                status,
                body: String::new(),
            }),
            Reply::Panic => panic!("scripted panic for {}", endpoint),
        }
    }
}

pub fn artist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "artist",
        "popularity": 50,
        "genres": ["electronic"]
    })
}

pub fn search_reply(artists: &[Value]) -> Reply {
    Reply::Json(json!({ "artists": { "items": artists } }))
}

pub fn related_reply(artists: &[Value]) -> Reply {
    Reply::Json(json!({ "artists": artists }))
}

pub fn tracks_reply(names: &[&str]) -> Reply {
    let tracks: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": format!("track-{}", i), "name": name }))
        .collect();
    Reply::Json(json!({ "tracks": tracks }))
}

/// The "Daft Punk" scenario: X with related Y and Z, both with top tracks
pub fn daft_punk_catalog() -> ScriptedCatalog {
    ScriptedCatalog::new()
        .on("search", search_reply(&[artist_json("X", "Daft Punk")]))
        .on(
            "artists/X/related-artists",
            related_reply(&[artist_json("Y", "Justice"), artist_json("Z", "Cassius")]),
        )
        .on("artists/Y/top-tracks", tracks_reply(&["D.A.N.C.E.", "Genesis"]))
        .on("artists/Z/top-tracks", tracks_reply(&["1999", "Feeling for You"]))
}

pub fn aggregator(catalog: &Arc<ScriptedCatalog>) -> ArtistAggregator {
    ArtistAggregator::new(Arc::clone(catalog) as Arc<dyn CatalogApi>, "US")
}

pub fn app_state(catalog: &Arc<ScriptedCatalog>, public_dir: &Path) -> AppState {
    AppState::new(aggregator(catalog), public_dir)
}
