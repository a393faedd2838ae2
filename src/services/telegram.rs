// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Telegram Bot API client and wire types.
//!
//! Handles:
//! - Outbound messages and edits (HTML parse mode, inline keyboards)
//! - Callback query acknowledgements
//! - Webhook registration and long-polling `getUpdates`
//!
//! `new_mock()` builds an offline client that records outbound messages
//! instead of sending them.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ─── Wire Types ──────────────────────────────────────────────

/// Incoming update. Only the kinds the bot reacts to are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TgUser>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram account (named to avoid confusion with the solo profile `User`).
#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TgUser,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    /// All callback payloads, row by row.
    pub fn callback_data(&self) -> Vec<&str> {
        self.inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| b.callback_data.as_deref())
            .collect()
    }
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// A message recorded by the mock client.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    /// Set when the message replaced an existing one via `editMessageText`
    pub edited_message_id: Option<i64>,
}

#[derive(Default)]
struct MockOutbox {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: AtomicBool,
}

// ─── Client ──────────────────────────────────────────────────

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    http: Option<reqwest::Client>,
    base_url: String,
    mock: Arc<MockOutbox>,
}

impl TelegramClient {
    /// Create a client for `{api_url}/bot{token}`.
    pub fn new(api_url: &str, bot_token: &str) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), bot_token),
            mock: Arc::default(),
        }
    }

    /// Create an offline client that records messages (for tests).
    pub fn new_mock() -> Self {
        Self {
            http: None,
            base_url: "mock://telegram".to_string(),
            mock: Arc::default(),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.http.is_none()
    }

    /// Messages recorded in mock mode, oldest first.
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.mock
            .sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Mock only: make subsequent sends and webhook calls fail with `AppError::Telegram`.
    pub fn set_mock_failure(&self, fail: bool) {
        self.mock.fail.store(fail, Ordering::SeqCst);
    }

    fn mock_failure(&self) -> Result<(), AppError> {
        if self.mock.fail.load(Ordering::SeqCst) {
            return Err(AppError::Telegram("mock delivery failure".to_string()));
        }
        Ok(())
    }

    fn record(&self, message: OutboundMessage) -> Result<(), AppError> {
        self.mock_failure()?;
        if let Ok(mut sent) = self.mock.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }

    /// Send an HTML message.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), AppError> {
        if self.is_mock() {
            return self.record(OutboundMessage {
                chat_id,
                text: text.to_string(),
                keyboard: keyboard.cloned(),
                edited_message_id: None,
            });
        }

        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = keyboard {
            body["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("keyboard encode: {e}")))?;
        }

        let _: serde_json::Value = self.call("sendMessage", &body, None).await?;
        Ok(())
    }

    /// Replace the text (and keyboard) of a message the bot sent earlier.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), AppError> {
        if self.is_mock() {
            return self.record(OutboundMessage {
                chat_id,
                text: text.to_string(),
                keyboard: keyboard.cloned(),
                edited_message_id: Some(message_id),
            });
        }

        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = keyboard {
            body["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("keyboard encode: {e}")))?;
        }

        match self
            .call::<serde_json::Value>("editMessageText", &body, None)
            .await
        {
            Ok(_) => Ok(()),
            // Re-rendering an unchanged card (e.g. clamped page) is not an error
            Err(AppError::Telegram(msg)) if msg.contains("message is not modified") => {
                tracing::debug!(chat_id, message_id, "Edit skipped: message not modified");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Acknowledge a button press, optionally with a toast.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), AppError> {
        if self.is_mock() {
            return Ok(());
        }

        let mut body = serde_json::json!({ "callback_query_id": callback_query_id });
        if let Some(text) = text {
            body["text"] = serde_json::Value::from(text);
        }
        let _: bool = self.call("answerCallbackQuery", &body, None).await?;
        Ok(())
    }

    /// Register the webhook URL (and the secret Telegram echoes back).
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), AppError> {
        if self.is_mock() {
            return Ok(());
        }

        let mut body = serde_json::json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret_token {
            body["secret_token"] = serde_json::Value::from(secret);
        }
        let _: bool = self.call("setWebhook", &body, None).await?;
        tracing::info!(url, "Telegram webhook registered");
        Ok(())
    }

    /// Remove any registered webhook so `getUpdates` can be used.
    pub async fn delete_webhook(&self) -> Result<(), AppError> {
        if self.is_mock() {
            return self.mock_failure();
        }

        let _: bool = self
            .call("deleteWebhook", &serde_json::json!({}), None)
            .await?;
        tracing::info!("Telegram webhook removed");
        Ok(())
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, AppError> {
        if self.is_mock() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        // Leave headroom over the server-side long-poll timeout
        let timeout = Duration::from_secs(timeout_secs + 10);
        self.call("getUpdates", &body, Some(timeout)).await
    }

    /// POST a Bot API method and unwrap the response envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<T, AppError> {
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| AppError::Telegram("client is offline".to_string()))?;

        let mut request = http.post(format!("{}/{}", self.base_url, method)).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Telegram(format!("{method} request failed: {e}")))?;

        let status = response.status();
        if status.as_u16() == 429 {
            tracing::warn!(method, "Telegram rate limit hit (429)");
        }

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::Telegram(format!("{method}: HTTP {status}: {e}")))?;

        if !envelope.ok {
            return Err(AppError::Telegram(format!(
                "{method}: HTTP {status}: {}",
                envelope.description.unwrap_or_default()
            )));
        }

        envelope
            .result
            .ok_or_else(|| AppError::Telegram(format!("{method}: missing result")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_callback_query_parses() {
        let json = r#"{
            "update_id": 1001,
            "callback_query": {
                "id": "cbq-1",
                "from": {"id": 42, "is_bot": false, "first_name": "Ann", "username": "ann"},
                "message": {"message_id": 7, "chat": {"id": 42, "type": "private"}, "date": 0},
                "data": "browse:2"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.from.username.as_deref(), Some("ann"));
        assert_eq!(query.data.as_deref(), Some("browse:2"));
        assert_eq!(query.message.unwrap().chat.id, 42);
        assert!(update.message.is_none());
    }

    #[test]
    fn test_api_envelope_parses_with_and_without_result() {
        let ok: ApiResponse<Message> = serde_json::from_str(
            r#"{"ok": true, "result": {"message_id": 9, "chat": {"id": 42, "type": "private"}}}"#,
        )
        .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap().message_id, 9);

        let failed: ApiResponse<Message> = serde_json::from_str(
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#,
        )
        .unwrap();
        assert!(!failed.ok);
        assert!(failed.result.is_none());
        assert_eq!(
            failed.description.as_deref(),
            Some("Bad Request: chat not found")
        );
    }

    #[test]
    fn test_keyboard_serializes_without_empty_fields() {
        let markup = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
            "Next", "browse:1",
        )]]);
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inline_keyboard": [[{"text": "Next", "callback_data": "browse:1"}]]})
        );
    }

    #[tokio::test]
    async fn test_mock_records_and_fails_on_demand() {
        let client = TelegramClient::new_mock();
        client.send_message(5, "hello", None).await.unwrap();
        client.edit_message_text(5, 9, "edited", None).await.unwrap();

        client.set_mock_failure(true);
        assert!(matches!(
            client.send_message(5, "lost", None).await,
            Err(AppError::Telegram(_))
        ));

        let sent = client.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].edited_message_id, Some(9));
    }

    #[test]
    fn test_base_url_includes_token() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:abc");
        assert_eq!(client.base_url, "https://api.telegram.org/bot123:abc");
        assert!(!client.is_mock());
    }
}
