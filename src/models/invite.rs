// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Invite model (team -> solo offer).

use super::{DecisionStatus, UserId};
use serde::{Deserialize, Serialize};

/// Stored in the `invites` collection, keyed by `invite_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    /// `inv_{team_owner_id}_{solo_id}_{epoch_secs}` (plus `_{n}` on collision)
    pub invite_id: String,
    pub team_owner_id: UserId,
    pub solo_id: UserId,
    pub status: DecisionStatus,
    pub created_at: String,
}

impl Invite {
    pub fn is_pending(&self) -> bool {
        self.status == DecisionStatus::Pending
    }

    pub fn is_between(&self, team_owner_id: UserId, solo_id: UserId) -> bool {
        self.team_owner_id == team_owner_id && self.solo_id == solo_id
    }
}
