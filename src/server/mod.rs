//! HTTP API for the scraper
//!
//! Routes mirror the UI's needs: scrape a thread, list and delete cache
//! entries, and chat over a scraped thread. Handlers map the error taxonomy
//! onto status codes — an unfetchable first page is a bad-gateway, a missing
//! record is a 404, everything else in the extraction path already degraded
//! inside the scraper and comes back as a normal record.

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::llm::ChatService;
use crate::models::{ChatRequest, DealRecord, DeleteRequest, ScrapeRequest, StoredFile};
use crate::scraper::{ScrapeOptions, ThreadScraper};
use crate::storage::{DealStore, DeleteOutcome};
use crate::utils::error::{ChatError, ScrapeError, StoreError};

/// Shared state for all handlers
pub struct AppState {
    pub scraper: ThreadScraper,
    pub store: Arc<DealStore>,
    /// Present only when an API key was configured
    pub chat: Option<ChatService>,
    /// Location of the bundled UI page
    pub index_path: PathBuf,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Chat response body
#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

/// Delete-all response body
#[derive(Debug, Serialize)]
struct DeleteAllResponse {
    deleted: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/scrape", post(scrape))
        .route("/files", get(list_files))
        .route("/delete_files", post(delete_files))
        .route("/delete_all_files", post(delete_all_files))
        .route("/chat", post(chat))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the bundled UI page
async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(page) => Ok(Html(page)),
        Err(_) => Err(api_error(StatusCode::NOT_FOUND, "index.html not found")),
    }
}

/// Scrape a thread (or return its cached record)
async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<DealRecord>, ApiError> {
    let opts = ScrapeOptions {
        max_pages: request.max_pages,
        force_refresh: request.force_refresh,
    };

    match state.scraper.scrape(&request.url, &opts).await {
        Ok(record) => Ok(Json(record)),
        Err(ScrapeError::FirstPageFetch(e)) => {
            error!(url = %request.url, error = %e, "first page fetch failed");
            Err(api_error(
                StatusCode::BAD_GATEWAY,
                format!("Failed to fetch thread: {e}"),
            ))
        }
        Err(ScrapeError::Store(e)) => {
            error!(url = %request.url, error = %e, "failed to persist scrape result");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save result: {e}"),
            ))
        }
    }
}

/// List cache entries, newest first
async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredFile>>, ApiError> {
    state.store.list().map(Json).map_err(|e| {
        error!(error = %e, "failed to list cache entries");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// Delete named cache entries, collecting per-item errors
async fn delete_files(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteRequest>,
) -> Json<DeleteOutcome> {
    Json(state.store.delete(&request.filenames))
}

/// Delete every cache entry
async fn delete_all_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteAllResponse>, ApiError> {
    state
        .store
        .delete_all()
        .map(|deleted| Json(DeleteAllResponse { deleted }))
        .map_err(|e| {
            error!(error = %e, "failed to clear cache");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

/// Chat over a scraped thread
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Some(service) = &state.chat else {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::MissingApiKey.to_string(),
        ));
    };

    match service.chat(&request).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(ChatError::Store(StoreError::NotFound(_))) => {
            Err(api_error(StatusCode::NOT_FOUND, "Data file not found"))
        }
        Err(e) => {
            error!(filename = %request.filename, error = %e, "chat request failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}
