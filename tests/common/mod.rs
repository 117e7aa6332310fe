#![allow(dead_code)]

use axum::Router;
use iss_tracker::api::{FetchError, PositionSource};
use iss_tracker::models::{SatellitePosition, UpstreamPosition};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Hands out queued results in order and counts how often it was asked.
pub struct ScriptedSource {
    queue: Mutex<VecDeque<Result<SatellitePosition, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(results: Vec<Result<SatellitePosition, FetchError>>) -> Self {
        Self {
            queue: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PositionSource for ScriptedSource {
    async fn fetch_position(&self) -> Result<SatellitePosition, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(FetchError::RequestFailed("script exhausted".into())))
    }
}

/// Validated position built from an upstream-shaped JSON value.
pub fn position(raw: Value) -> SatellitePosition {
    serde_json::from_value::<UpstreamPosition>(raw)
        .unwrap()
        .validate()
        .unwrap()
}
