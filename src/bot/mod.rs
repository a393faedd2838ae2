// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Telegram chat front end.
//!
//! Both ingress paths (webhook and long polling) hand every update to
//! [`handle_update`]. Entity errors become chat replies here; nothing
//! propagates back to the transport.

pub mod callback;
pub mod dialogue;
pub mod handlers;
pub mod keyboards;
pub mod polling;
pub mod texts;

pub use callback::CallbackAction;
pub use dialogue::{Dialogue, DialogueStore};

use crate::error::AppError;
use crate::services::telegram::{CallbackQuery, Message, Update};
use crate::AppState;
use handlers::ChatContext;

/// Dispatch one update. Never fails: errors are reported to the user and logged.
pub async fn handle_update(state: &AppState, update: Update) {
    let update_id = update.update_id;
    if let Some(query) = update.callback_query {
        handle_callback_query(state, query).await;
    } else if let Some(message) = update.message {
        handle_message(state, message).await;
    } else {
        tracing::debug!(update_id, "Ignoring unsupported update kind");
    }
}

async fn handle_message(state: &AppState, message: Message) {
    let (Some(user), Some(text)) = (message.from.as_ref(), message.text.as_deref()) else {
        tracing::debug!(chat_id = message.chat.id, "Ignoring message without sender or text");
        return;
    };

    let ctx = ChatContext {
        state,
        chat_id: message.chat.id,
        user,
        message_id: None,
    };

    let result = match parse_command(text) {
        Some(command) => {
            tracing::debug!(user_id = user.id, command, "Command received");
            handlers::handle_command(&ctx, command).await
        }
        None => handlers::handle_text(&ctx, text).await,
    };

    if let Err(err) = result {
        log_error(&err, user.id);
        let reply = texts::error_text(&err);
        if let Err(e) = state.telegram.send_message(ctx.chat_id, &reply, None).await {
            tracing::warn!(chat_id = ctx.chat_id, error = %e, "Failed to deliver error reply");
        }
    }
}

async fn handle_callback_query(state: &AppState, query: CallbackQuery) {
    let data = query.data.as_deref().unwrap_or_default();
    let Some(action) = CallbackAction::parse(data) else {
        tracing::debug!(user_id = query.from.id, data, "Ignoring unknown callback data");
        answer(state, &query.id, None).await;
        return;
    };

    let ctx = ChatContext {
        state,
        chat_id: query
            .message
            .as_ref()
            .map_or(query.from.id, |m| m.chat.id),
        user: &query.from,
        message_id: query.message.as_ref().map(|m| m.message_id),
    };

    tracing::debug!(user_id = query.from.id, action = %action, "Button pressed");
    match handlers::handle_callback(&ctx, action).await {
        Ok(toast) => answer(state, &query.id, toast).await,
        Err(err) => {
            log_error(&err, query.from.id);
            answer(state, &query.id, Some(&texts::error_text(&err))).await;
        }
    }
}

async fn answer(state: &AppState, callback_query_id: &str, text: Option<&str>) {
    if let Err(e) = state
        .telegram
        .answer_callback_query(callback_query_id, text)
        .await
    {
        tracing::warn!(error = %e, "Failed to answer callback query");
    }
}

/// Entity errors are expected outcomes; system errors need attention.
fn log_error(err: &AppError, user_id: i64) {
    if err.is_entity_error() {
        tracing::debug!(user_id, error = %err, "Action rejected");
    } else {
        tracing::error!(user_id, error = %err, "Action failed");
    }
}

/// `/cmd@botname args` -> `/cmd`. Plain text is not a command.
fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    Some(first.split('@').next().unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/start"), Some("/start"));
        assert_eq!(parse_command("/stats@jam_bot"), Some("/stats"));
        assert_eq!(parse_command("  /cancel now"), Some("/cancel"));
        assert_eq!(parse_command("hello /start"), None);
        assert_eq!(parse_command(""), None);
    }
}
