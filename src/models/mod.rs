// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod invite;
pub mod request;
pub mod state;
pub mod stats;
pub mod team;
pub mod user;

pub use invite::Invite;
pub use request::JoinRequest;
pub use state::{DecisionEvent, DecisionStateMachine, DecisionStatus, StateError};
pub use stats::AdminStats;
pub use team::{Role, Team, TeamProfile};
pub use user::{AgeCategory, ParticipationFormat, SoloProfile, Specialty, User};

use serde::{Deserialize, Deserializer};

/// Telegram user id. Also the identity of a solo profile and of a team owner.
pub type UserId = i64;

/// Minimum length (characters, after trimming) of display and team names.
pub const MIN_NAME_CHARS: usize = 2;
/// Minimum length (characters, after trimming) of profile descriptions.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Error returned when parsing an enum from its wire identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Deserialize an optional string, mapping `""` (legacy "no value") to `None`.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Normalize an optional free-text field: trim, and drop it when empty.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn default_true() -> bool {
    true
}
