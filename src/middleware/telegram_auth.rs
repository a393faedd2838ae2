// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook secret-token authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header Telegram echoes back with the secret given to `setWebhook`.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Require the configured secret on webhook requests.
///
/// With no `WEBHOOK_SECRET` configured every request passes.
pub async fn require_telegram_secret(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.webhook_secret.as_deref() else {
        return Ok(next.run(request).await);
    };

    let Some(provided) = request.headers().get(SECRET_TOKEN_HEADER) else {
        tracing::warn!("Blocked webhook request without secret token header");
        return Err(AppError::Unauthorized);
    };

    if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        tracing::warn!("Blocked webhook request with wrong secret token");
        return Err(AppError::Forbidden("invalid secret token".to_string()));
    }

    Ok(next.run(request).await)
}
