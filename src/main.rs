// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Jam-Matchmaker bot server
//!
//! Receives Telegram updates by webhook when `PUBLIC_URL` is set and by
//! long polling otherwise. The HTTP server always runs for health checks.

use jam_matchmaker::{
    bot::polling::run_polling,
    config::Config,
    db::{JsonStore, Repository},
    services::TelegramClient,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        admins = config.admin_ids.len(),
        "Starting Jam-Matchmaker"
    );

    // Open the JSON document store
    let store = JsonStore::open(&config.data_dir).expect("Failed to open data directory");
    tracing::info!(path = %store.dir().display(), "Data store opened");
    let db = Repository::new(store);

    let telegram = TelegramClient::new(&config.telegram_api_url, &config.bot_token);

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, telegram));

    match config.webhook_url() {
        Some(url) => {
            state
                .telegram
                .set_webhook(&url, config.webhook_secret.as_deref())
                .await?;
            if config.webhook_secret.is_none() {
                tracing::warn!("WEBHOOK_SECRET not set; webhook requests are not authenticated");
            }
            tracing::info!(url = %url, "Webhook registered");
        }
        None => {
            tokio::spawn(run_polling(state.clone()));
        }
    }

    // Build router
    let app = jam_matchmaker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jam_matchmaker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
