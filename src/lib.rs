// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Jam-Matchmaker: Telegram bot that pairs game jam participants with teams
//!
//! This crate provides the bot dialogue, the JSON-file repository, and the
//! HTTP surface (webhook + health check) the bot runs behind.

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use bot::DialogueStore;
use config::Config;
use db::Repository;
use services::{MatchmakingService, TelegramClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Repository,
    pub telegram: TelegramClient,
    pub matchmaking: MatchmakingService,
    pub dialogues: DialogueStore,
}

impl AppState {
    /// Wire the services together over one repository and client.
    pub fn new(config: Config, db: Repository, telegram: TelegramClient) -> Self {
        let matchmaking = MatchmakingService::new(db.clone(), telegram.clone(), &config.admin_ids);
        Self {
            config,
            db,
            telegram,
            matchmaking,
            dialogues: DialogueStore::new(),
        }
    }
}
