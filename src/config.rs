// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::models::UserId;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Users allowed to run /stats and /admin
    pub admin_ids: Vec<UserId>,
    /// Directory holding the JSON documents
    pub data_dir: PathBuf,
    /// Server port
    pub port: u16,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` on webhook requests
    pub webhook_secret: Option<String>,
    /// Public base URL; when set the bot runs in webhook mode
    pub public_url: Option<String>,
    /// Bot API base URL
    pub telegram_api_url: String,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bot_token: env::var("BOT_TOKEN")
                .map(|v| v.trim().to_string())
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("BOT_TOKEN"))?,
            admin_ids: parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default())?,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            port: match env::var("PORT") {
                Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "PORT",
                    value: raw.clone(),
                })?,
                Err(_) => 8080,
            },
            webhook_secret: optional("WEBHOOK_SECRET"),
            public_url: optional("PUBLIC_URL").map(|u| u.trim_end_matches('/').to_string()),
            telegram_api_url: optional("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            bot_token: "123456:test-token".to_string(),
            admin_ids: vec![1],
            data_dir: PathBuf::from("./data"),
            port: 8080,
            webhook_secret: Some("test_webhook_secret".to_string()),
            public_url: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
        }
    }

    /// Full webhook URL, when running in webhook mode.
    pub fn webhook_url(&self) -> Option<String> {
        self.public_url
            .as_ref()
            .map(|base| format!("{base}/telegram/webhook"))
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma-separated integer ids; blank entries are skipped.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ConfigError::Invalid {
                name: "ADMIN_IDS",
                value: s.to_string(),
            })
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids("").unwrap(), Vec::<UserId>::new());
        assert_eq!(parse_admin_ids("1, 2,,3 ").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            parse_admin_ids("1,abc"),
            Err(ConfigError::Invalid { name: "ADMIN_IDS", .. })
        ));
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches the process environment
        env::set_var("BOT_TOKEN", " 42:abc ");
        env::set_var("ADMIN_IDS", "7,8");
        env::set_var("PUBLIC_URL", "https://bot.example.org/");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.bot_token, "42:abc");
        assert_eq!(config.admin_ids, vec![7, 8]);
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.webhook_url().as_deref(),
            Some("https://bot.example.org/telegram/webhook")
        );
    }

    #[test]
    fn test_default_is_polling_mode() {
        let config = Config::test_default();
        assert!(config.webhook_url().is_none());
        assert_eq!(config.admin_ids, vec![1]);
    }
}
