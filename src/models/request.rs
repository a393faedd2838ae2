// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Join request model (solo -> team application).

use super::{DecisionStatus, UserId};
use serde::{Deserialize, Serialize};

/// Stored in the `requests` collection, keyed by `request_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    /// `{solo_id}_{team_owner_id}_{epoch_secs}` (plus `_{n}` on collision)
    pub request_id: String,
    pub solo_id: UserId,
    pub team_owner_id: UserId,
    pub status: DecisionStatus,
    pub created_at: String,
}

impl JoinRequest {
    pub fn is_pending(&self) -> bool {
        self.status == DecisionStatus::Pending
    }

    pub fn is_between(&self, solo_id: UserId, team_owner_id: UserId) -> bool {
        self.solo_id == solo_id && self.team_owner_id == team_owner_id
    }
}
