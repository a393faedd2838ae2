// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin statistics computed over the whole store.

use serde::Serialize;

use crate::models::{Invite, JoinRequest, Team, User};

/// Counters shown to allow-listed admins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_teams: usize,
    /// Teams that are not paused
    pub active_teams: usize,
    pub total_users: usize,
    pub active_users: usize,
    pub pending_requests: usize,
    pub pending_invites: usize,
}

impl AdminStats {
    /// Fold one team into the counters.
    pub fn add_team(&mut self, team: &Team) {
        self.total_teams += 1;
        if team.is_active() {
            self.active_teams += 1;
        }
    }

    pub fn add_user(&mut self, user: &User) {
        self.total_users += 1;
        if user.is_active {
            self.active_users += 1;
        }
    }

    pub fn add_request(&mut self, request: &JoinRequest) {
        if request.is_pending() {
            self.pending_requests += 1;
        }
    }

    pub fn add_invite(&mut self, invite: &Invite) {
        if invite.is_pending() {
            self.pending_invites += 1;
        }
    }
}
