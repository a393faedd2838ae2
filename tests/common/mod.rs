// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use jam_matchmaker::config::Config;
use jam_matchmaker::db::{JsonStore, Repository};
use jam_matchmaker::models::{
    AgeCategory, ParticipationFormat, Role, SoloProfile, Specialty, TeamProfile, UserId,
};
use jam_matchmaker::routes::create_router;
use jam_matchmaker::services::TelegramClient;
use jam_matchmaker::AppState;
use std::sync::Arc;
use tempfile::TempDir;

/// Admin id configured by `Config::test_default()`.
#[allow(dead_code)]
pub const ADMIN_ID: UserId = 1;

/// Create a repository over a fresh temporary directory.
/// The directory is removed when the returned `TempDir` is dropped.
#[allow(dead_code)]
pub fn test_repo() -> (Repository, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonStore::open(dir.path()).expect("Failed to open store");
    (Repository::new(store), dir)
}

/// Create a test app with a temporary data directory and a mock Telegram client.
/// Returns the router, the shared state, and the directory guard.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let (db, dir) = test_repo();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::test_default()
    };
    let state = Arc::new(AppState::new(config, db, TelegramClient::new_mock()));

    (create_router(state.clone()), state, dir)
}

#[allow(dead_code)]
pub fn solo_profile(user_id: UserId, name: &str, specialty: Specialty) -> SoloProfile {
    SoloProfile {
        user_id,
        username: Some(format!("user{user_id}")),
        display_name: name.to_string(),
        age_category: AgeCategory::Adult,
        participation_format: ParticipationFormat::Online,
        specialty,
        description: format!("{name} has shipped several jam games"),
    }
}

#[allow(dead_code)]
pub fn team_profile(owner_id: UserId, name: Option<&str>) -> TeamProfile {
    TeamProfile {
        owner_id,
        owner_username: Some(format!("owner{owner_id}")),
        team_name: name.map(str::to_string),
        pitch_format: ParticipationFormat::Online,
        description: "Cozy puzzle game about lighthouses".to_string(),
        roles: vec![Role::Programmer, Role::Music],
    }
}

/// A Telegram text message update.
#[allow(dead_code)]
pub fn message_update(update_id: i64, user_id: UserId, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "from": { "id": user_id, "is_bot": false, "first_name": "Test", "username": format!("user{user_id}") },
            "chat": { "id": user_id, "type": "private" },
            "date": 1_700_000_000,
            "text": text,
        }
    })
}

/// A Telegram button press update on message `message_id`.
#[allow(dead_code)]
pub fn callback_update(
    update_id: i64,
    user_id: UserId,
    message_id: i64,
    data: &str,
) -> serde_json::Value {
    serde_json::json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb{update_id}"),
            "from": { "id": user_id, "is_bot": false, "first_name": "Test", "username": format!("user{user_id}") },
            "message": {
                "message_id": message_id,
                "chat": { "id": user_id, "type": "private" },
                "date": 1_700_000_000,
            },
            "chat_instance": "1",
            "data": data,
        }
    })
}
