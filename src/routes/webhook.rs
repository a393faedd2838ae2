// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook route for Telegram updates.

use crate::middleware::require_telegram_secret;
use crate::services::telegram::Update;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;

pub const WEBHOOK_PATH: &str = "/telegram/webhook";

/// Webhook routes (secret-token protected).
pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_update))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_telegram_secret,
        ))
}

/// Handle one update (POST).
///
/// Always 200 once authenticated: any other status makes Telegram redeliver
/// the same update.
async fn handle_update(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> StatusCode {
    // Parsed by hand so malformed bodies still get a 200
    let update: Update = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse Telegram update");
            return StatusCode::OK;
        }
    };

    tracing::debug!(update_id = update.update_id, "Webhook update received");
    crate::bot::handle_update(&state, update).await;
    StatusCode::OK
}
