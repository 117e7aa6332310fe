//! HTTP surface of the tracker.
//!
//! [`router`] wires three routes:
//!
//! - `GET /` serves the embedded map page,
//! - `GET /static/script.js` serves the script that polls the position,
//! - `GET /iss-location` fetches the upstream position and returns it in
//!   display units.
//!
//! Every failure on the position route collapses into a 500 with an `error`
//! field. Upstream details stay in the server log unless debug mode is on.

use crate::api::{FetchError, PositionSource};
use crate::models::NormalizedResponse;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCRIPT_JS: &str = include_str!("../static/script.js");

/// Shared, read-only state handed to every request.
pub struct AppState<S> {
    pub source: S,
    pub debug_mode: bool,
}

impl<S> AppState<S> {
    pub fn new(source: S, debug_mode: bool) -> Arc<Self> {
        Arc::new(Self { source, debug_mode })
    }
}

/// Failure of the position route.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] FetchError),
    #[error("internal fault: {0}")]
    Internal(String),
}

impl ApiError {
    fn public_message(&self) -> &'static str {
        match self {
            ApiError::Upstream(_) => "Failed to retrieve ISS data",
            ApiError::Internal(_) => "Internal server error",
        }
    }

    fn into_response_with(self, debug_mode: bool) -> Response {
        let body = if debug_mode {
            json!({ "error": self.public_message(), "details": self.to_string() })
        } else {
            json!({ "error": self.public_message() })
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

pub fn router<S: PositionSource>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/static/script.js", get(script))
        .route("/iss-location", get(iss_location::<S>))
        .with_state(state)
}

async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], SCRIPT_JS)
}

/// `GET /iss-location`: one fresh upstream fetch per call.
async fn iss_location<S: PositionSource>(State(state): State<Arc<AppState<S>>>) -> Response {
    match current_position(&state.source).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!("ISS location request failed: {}", e);
            e.into_response_with(state.debug_mode)
        }
    }
}

async fn current_position<S: PositionSource>(source: &S) -> Result<NormalizedResponse, ApiError> {
    let position = source.fetch_position().await?;

    position
        .normalize()
        .map_err(|e| ApiError::Internal(e.to_string()))
}
