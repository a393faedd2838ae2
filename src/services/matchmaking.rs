// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inbound matchmaking operations.
//!
//! Each method is one user action: it checks authorization and invariants,
//! applies the change through the [`Repository`], then notifies the other
//! party. Notifications are best effort and never undo a persisted change.

use crate::bot::{keyboards, texts};
use crate::db::Repository;
use crate::error::AppError;
use crate::models::{
    AdminStats, DecisionEvent, Invite, JoinRequest, SoloProfile, Specialty, Team, TeamProfile,
    User, UserId,
};
use crate::services::matching::{paginate, BrowseResult};
use crate::services::telegram::{InlineKeyboardMarkup, TelegramClient};
use std::sync::Arc;
use validator::Validate;

/// A pending request together with the applicant's profile, if it still exists.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request: JoinRequest,
    pub solo: Option<User>,
}

/// A pending invite together with the inviting team, if it still exists.
#[derive(Debug, Clone)]
pub struct PendingInvite {
    pub invite: Invite,
    pub team: Option<Team>,
}

#[derive(Clone)]
pub struct MatchmakingService {
    repo: Repository,
    telegram: TelegramClient,
    admin_ids: Arc<[UserId]>,
}

impl MatchmakingService {
    pub fn new(repo: Repository, telegram: TelegramClient, admin_ids: &[UserId]) -> Self {
        Self {
            repo,
            telegram,
            admin_ids: admin_ids.into(),
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_ids.contains(&user_id)
    }

    // ─── Profiles ────────────────────────────────────────────────

    pub async fn submit_solo_profile(&self, profile: SoloProfile) -> Result<User, AppError> {
        let profile = profile.normalized();
        profile.validate()?;
        self.repo.save_user(&profile).await
    }

    pub async fn set_solo_active(&self, user_id: UserId, is_active: bool) -> Result<(), AppError> {
        if !self.repo.set_user_active(user_id, is_active).await? {
            return Err(AppError::NotFound(format!("profile for user {user_id}")));
        }
        Ok(())
    }

    /// Validate and upsert the owner's team. Nothing is stored on failure.
    pub async fn submit_team_profile(&self, profile: TeamProfile) -> Result<Team, AppError> {
        let profile = profile.normalized();
        profile.validate()?;
        self.repo.save_team(&profile).await
    }

    /// Returns the new paused value.
    pub async fn toggle_team_pause(&self, owner_id: UserId) -> Result<bool, AppError> {
        self.repo
            .toggle_team_pause(owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("team of owner {owner_id}")))
    }

    pub async fn delete_team(&self, owner_id: UserId) -> Result<(), AppError> {
        if !self.repo.delete_team(owner_id).await? {
            return Err(AppError::NotFound(format!("team of owner {owner_id}")));
        }
        Ok(())
    }

    // ─── Browsing ────────────────────────────────────────────────

    /// Re-runs the filter on every call; results are never cached.
    pub async fn browse_active_teams(&self, page: i64) -> Result<BrowseResult<Team>, AppError> {
        Ok(paginate(self.repo.get_active_teams().await?, page))
    }

    pub async fn browse_active_solos(
        &self,
        specialty: Option<Specialty>,
        page: i64,
    ) -> Result<BrowseResult<User>, AppError> {
        Ok(paginate(
            self.repo.get_active_users_by_specialty(specialty).await?,
            page,
        ))
    }

    // ─── Requests ────────────────────────────────────────────────

    /// Solo applies to a team; the owner gets Accept/Deny buttons.
    pub async fn send_request(
        &self,
        solo_id: UserId,
        team_owner_id: UserId,
    ) -> Result<JoinRequest, AppError> {
        let solo = self
            .repo
            .get_user(solo_id)
            .await?
            .ok_or_else(|| AppError::Validation("fill in your profile first".to_string()))?;
        if self.repo.get_team(team_owner_id).await?.is_none() {
            return Err(AppError::NotFound(format!("team of owner {team_owner_id}")));
        }
        if solo_id == team_owner_id {
            return Err(AppError::Validation(
                "you cannot apply to your own team".to_string(),
            ));
        }

        let request = self
            .repo
            .create_request(solo_id, team_owner_id)
            .await?
            .ok_or_else(|| AppError::Duplicate("request already sent to this team".to_string()))?;

        self.notify(
            team_owner_id,
            &texts::new_request(&solo),
            Some(&keyboards::request_decision(&request.request_id)),
        )
        .await;
        Ok(request)
    }

    pub async fn accept_request(
        &self,
        request_id: &str,
        acting_owner_id: UserId,
    ) -> Result<JoinRequest, AppError> {
        self.decide_request(request_id, acting_owner_id, DecisionEvent::Accept)
            .await
    }

    pub async fn deny_request(
        &self,
        request_id: &str,
        acting_owner_id: UserId,
    ) -> Result<JoinRequest, AppError> {
        self.decide_request(request_id, acting_owner_id, DecisionEvent::Deny)
            .await
    }

    async fn decide_request(
        &self,
        request_id: &str,
        acting_owner_id: UserId,
        event: DecisionEvent,
    ) -> Result<JoinRequest, AppError> {
        let existing = self
            .repo
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("request {request_id}")))?;
        if existing.team_owner_id != acting_owner_id {
            tracing::warn!(
                request_id,
                actor = acting_owner_id,
                owner = existing.team_owner_id,
                "Request decision by non-addressee rejected"
            );
            return Err(AppError::Forbidden("this request is not yours".to_string()));
        }

        let request = self.repo.transition_request(request_id, event).await?;

        let team = self.repo.get_team(request.team_owner_id).await?;
        let team_name = team
            .as_ref()
            .map(Team::display_name)
            .unwrap_or_else(|| "the team".to_string());
        let text = match event {
            DecisionEvent::Accept => texts::request_accepted(
                &team_name,
                &team
                    .as_ref()
                    .map(Team::owner_contact)
                    .unwrap_or_else(|| format!("ID: {}", request.team_owner_id)),
            ),
            DecisionEvent::Deny => texts::request_denied(&team_name),
        };
        self.notify(request.solo_id, &text, None).await;
        Ok(request)
    }

    /// Pending requests addressed to the owner's team, oldest first.
    pub async fn pending_requests_for_team(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<PendingRequest>, AppError> {
        let requests = self.repo.get_pending_requests_for_team(owner_id).await?;
        let users = self.repo.get_users().await?;
        Ok(requests
            .into_iter()
            .map(|request| PendingRequest {
                solo: users.get(&User::storage_key(request.solo_id)).cloned(),
                request,
            })
            .collect())
    }

    // ─── Invites ─────────────────────────────────────────────────

    /// Team invites a solo; the solo gets Accept/Deny buttons.
    pub async fn send_invite(
        &self,
        team_owner_id: UserId,
        solo_id: UserId,
    ) -> Result<Invite, AppError> {
        let team = self
            .repo
            .get_team(team_owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("team of owner {team_owner_id}")))?;
        if self.repo.get_user(solo_id).await?.is_none() {
            return Err(AppError::NotFound(format!("profile for user {solo_id}")));
        }
        if solo_id == team_owner_id {
            return Err(AppError::Validation("you cannot invite yourself".to_string()));
        }

        let invite = self
            .repo
            .create_invite(team_owner_id, solo_id)
            .await?
            .ok_or_else(|| AppError::Duplicate("invite already sent to this person".to_string()))?;

        self.notify(
            solo_id,
            &texts::new_invite(&team),
            Some(&keyboards::invite_decision(&invite.invite_id)),
        )
        .await;
        Ok(invite)
    }

    pub async fn accept_invite(
        &self,
        invite_id: &str,
        acting_solo_id: UserId,
    ) -> Result<Invite, AppError> {
        self.decide_invite(invite_id, acting_solo_id, DecisionEvent::Accept)
            .await
    }

    pub async fn deny_invite(
        &self,
        invite_id: &str,
        acting_solo_id: UserId,
    ) -> Result<Invite, AppError> {
        self.decide_invite(invite_id, acting_solo_id, DecisionEvent::Deny)
            .await
    }

    async fn decide_invite(
        &self,
        invite_id: &str,
        acting_solo_id: UserId,
        event: DecisionEvent,
    ) -> Result<Invite, AppError> {
        let existing = self
            .repo
            .get_invite(invite_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("invite {invite_id}")))?;
        if existing.solo_id != acting_solo_id {
            tracing::warn!(
                invite_id,
                actor = acting_solo_id,
                solo = existing.solo_id,
                "Invite decision by non-addressee rejected"
            );
            return Err(AppError::Forbidden("this invite is not yours".to_string()));
        }

        let invite = self.repo.transition_invite(invite_id, event).await?;

        let solo = self.repo.get_user(invite.solo_id).await?;
        let contact = solo
            .as_ref()
            .map(User::contact)
            .unwrap_or_else(|| format!("ID: {}", invite.solo_id));
        let name = solo
            .as_ref()
            .map(|u| u.shown_name().to_string())
            .unwrap_or_else(|| contact.clone());
        let text = match event {
            DecisionEvent::Accept => texts::invite_accepted(&name, &contact),
            DecisionEvent::Deny => texts::invite_denied(&name),
        };
        self.notify(invite.team_owner_id, &text, None).await;
        Ok(invite)
    }

    /// Pending invites addressed to the solo, oldest first.
    pub async fn pending_invites_for_solo(
        &self,
        solo_id: UserId,
    ) -> Result<Vec<PendingInvite>, AppError> {
        let invites = self.repo.get_pending_invites_for_solo(solo_id).await?;
        let teams = self.repo.get_teams().await?;
        Ok(invites
            .into_iter()
            .map(|invite| PendingInvite {
                team: teams.get(&Team::storage_key(invite.team_owner_id)).cloned(),
                invite,
            })
            .collect())
    }

    // ─── Admin ───────────────────────────────────────────────────

    pub async fn admin_stats(&self, actor_id: UserId) -> Result<AdminStats, AppError> {
        if !self.is_admin(actor_id) {
            tracing::warn!(actor = actor_id, "Admin stats requested by non-admin");
            return Err(AppError::Forbidden("admins only".to_string()));
        }
        self.repo.admin_stats().await
    }

    // ─── Notifications ───────────────────────────────────────────

    /// Fire-and-forget: a failed send is logged and otherwise ignored.
    async fn notify(&self, chat_id: UserId, text: &str, keyboard: Option<&InlineKeyboardMarkup>) {
        if let Err(e) = self.telegram.send_message(chat_id, text, keyboard).await {
            tracing::warn!(chat_id, error = %e, "Notification not delivered");
        }
    }
}
