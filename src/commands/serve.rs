//! The `serve` command: run the HTTP API

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::{ChatService, GeminiClient};
use crate::scraper::ThreadScraper;
use crate::server::{router, AppState};
use crate::storage::DealStore;

/// Start the scraper HTTP server
///
/// CLI host/port override the environment configuration when given. Chat is
/// wired up only when an API key is configured; the route stays mounted and
/// answers with an explanatory error otherwise.
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = Config::from_env()?;
    config.validate().context("Invalid configuration")?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let store = Arc::new(DealStore::new(&config.storage.data_dir));
    let scraper = ThreadScraper::new(&config.scraper, Arc::clone(&store))?;

    let chat = match &config.llm.api_key {
        Some(api_key) => {
            let client = GeminiClient::new(
                api_key.clone(),
                config.llm.model.clone(),
                Duration::from_secs(config.llm.timeout_secs),
            )
            .context("Failed to create Gemini client")?;
            Some(ChatService::new(client, Arc::clone(&store)))
        }
        None => {
            tracing::warn!("GOOGLE_API_KEY not set, chat endpoint disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        scraper,
        store,
        chat,
        index_path: PathBuf::from("index.html"),
    });

    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, data_dir = %config.storage.data_dir.display(), "HTTP server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
