//! HTTP REST API.
//!
//! `POST /analyze-song` runs the lookup pipeline; `/songs` reads and writes
//! the song library.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use runability::{AnalysisResult, AnalyzeError, Analyzer, PageFetcher, SongQuery};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::library::{AddOutcome, NewSong, SongLibrary};

/// Shared state passed to all handlers via axum State.
pub struct AppState {
    pub analyzer: Analyzer<Arc<dyn PageFetcher>>,
    pub library: Mutex<SongLibrary>,
}

impl AppState {
    pub fn new(analyzer: Analyzer<Arc<dyn PageFetcher>>, library: SongLibrary) -> Self {
        Self {
            analyzer,
            library: Mutex::new(library),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze-song", post(analyze_song))
        .route("/analyze-song/", post(analyze_song))
        .route("/songs", get(list_songs).post(add_song))
        .route("/add-song", post(add_song))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `addr` until Ctrl-C.
pub async fn start(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────

/// An analysis failure rendered as `{ "error": { "code", "message" } }`.
#[derive(Debug)]
pub struct ApiError(pub AnalyzeError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AnalyzeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalyzeError::SongNotFound(_) => StatusCode::NOT_FOUND,
            AnalyzeError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            AnalyzeError::Network(_) => StatusCode::BAD_GATEWAY,
            AnalyzeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AnalyzeError::Parse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AnalyzeError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": { "code": self.0.code(), "message": self.0.to_string() }
        });
        (self.status(), Json(body)).into_response()
    }
}

fn library_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn analyze_song(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SongQuery>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(query) = payload?;
    let result = state.analyzer.analyze(&query).await?;
    Ok(Json(result))
}

async fn list_songs(State(state): State<Arc<AppState>>) -> Response {
    let library = state.library.lock().await;
    match library.list() {
        Ok(songs) => Json(json!({ "songs": songs })).into_response(),
        Err(e) => {
            tracing::error!("Listing songs failed: {e:#}");
            library_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

async fn add_song(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewSong>, JsonRejection>,
) -> Response {
    let song = match payload.ok().and_then(|Json(song)| song.validate()) {
        Some(song) => song,
        None => return library_error(StatusCode::BAD_REQUEST, "Missing required fields"),
    };

    let library = state.library.lock().await;
    match library.add(song) {
        Ok(AddOutcome::Added(record)) => {
            tracing::info!("Saved song {} ({} - {})", record.id, record.artist, record.title);
            (StatusCode::CREATED, Json(json!({ "song": record }))).into_response()
        }
        Ok(AddOutcome::Duplicate(id)) => {
            library_error(StatusCode::CONFLICT, &format!("Song {id} already exists"))
        }
        Err(e) => {
            tracing::error!("Saving song failed: {e:#}");
            library_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}
