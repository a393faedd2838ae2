// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod matching;
pub mod matchmaking;
pub mod telegram;

pub use matching::{paginate, BrowseResult, Page};
pub use matchmaking::{MatchmakingService, PendingInvite, PendingRequest};
pub use telegram::TelegramClient;
