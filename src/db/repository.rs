// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed repository over the JSON store.
//!
//! Provides identity and uniqueness rules for:
//! - Users (one solo profile per user id)
//! - Teams (one team per owner, numbered once)
//! - Requests and invites (at most one pending record per pair)
//!
//! Every mutation is a read-modify-write of a whole collection performed
//! while holding that collection's lock, so concurrent handlers cannot lose
//! each other's updates.

use crate::db::store::{Collection, JsonStore};
use crate::error::AppError;
use crate::models::{
    AdminStats, DecisionEvent, DecisionStateMachine, DecisionStatus, Invite, JoinRequest,
    SoloProfile, Specialty, Team, TeamProfile, User, UserId,
};
use crate::time_utils::now_rfc3339;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key of the team number high-water mark in the sequences document.
const TEAM_NUMBER_SEQUENCE: &str = "team_number";

/// What a read-modify-write closure wants done with the collection.
enum Apply<R> {
    /// Persist the modified collection, then return the value.
    Commit(R),
    /// Leave the document untouched.
    Skip(R),
}

#[derive(Default)]
struct CollectionLocks {
    users: Mutex<()>,
    teams: Mutex<()>,
    requests: Mutex<()>,
    invites: Mutex<()>,
}

impl CollectionLocks {
    fn get(&self, collection: Collection) -> &Mutex<()> {
        match collection {
            Collection::Users => &self.users,
            // The sequences document is only touched during team creation.
            Collection::Teams | Collection::Sequences => &self.teams,
            Collection::Requests => &self.requests,
            Collection::Invites => &self.invites,
        }
    }
}

/// Repository owning the persisted store. Cheap to clone.
#[derive(Clone)]
pub struct Repository {
    store: Arc<JsonStore>,
    locks: Arc<CollectionLocks>,
}

impl Repository {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store: Arc::new(store),
            locks: Arc::new(CollectionLocks::default()),
        }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    // ─── Store Plumbing ──────────────────────────────────────────

    async fn load<T>(&self, collection: Collection) -> Result<BTreeMap<String, T>, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.read::<T>(collection))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("store read task failed: {e}")))?
            .map_err(AppError::from)
    }

    async fn save<T>(
        &self,
        collection: Collection,
        records: BTreeMap<String, T>,
    ) -> Result<BTreeMap<String, T>, AppError>
    where
        T: Serialize + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.write(collection, &records).map(|_| records))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("store write task failed: {e}")))?
            .map_err(AppError::from)
    }

    /// Snapshot of a whole collection.
    async fn read_all<T>(&self, collection: Collection) -> Result<BTreeMap<String, T>, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let _guard = self.locks.get(collection).lock().await;
        self.load(collection).await
    }

    /// Read-modify-write under the collection lock.
    async fn update<T, R, F>(&self, collection: Collection, f: F) -> Result<R, AppError>
    where
        T: DeserializeOwned + Serialize + Send + 'static,
        F: FnOnce(&mut BTreeMap<String, T>) -> Result<Apply<R>, AppError>,
    {
        let _guard = self.locks.get(collection).lock().await;
        let mut records = self.load::<T>(collection).await?;
        match f(&mut records)? {
            Apply::Commit(value) => {
                self.save(collection, records).await?;
                Ok(value)
            }
            Apply::Skip(value) => Ok(value),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_users(&self) -> Result<BTreeMap<String, User>, AppError> {
        self.read_all(Collection::Users).await
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.get_users().await?.remove(&User::storage_key(user_id)))
    }

    /// Create or overwrite a solo profile.
    ///
    /// Profile fields are always replaced; `is_active` and `created_at`
    /// survive re-submission.
    pub async fn save_user(&self, profile: &SoloProfile) -> Result<User, AppError> {
        let key = User::storage_key(profile.user_id);
        let user = self
            .update(Collection::Users, |users: &mut BTreeMap<String, User>| {
                let existing = users.get(&key);
                let user = User {
                    user_id: profile.user_id,
                    username: profile.username.clone(),
                    display_name: if profile.display_name.is_empty() {
                        profile.username.clone().unwrap_or_default()
                    } else {
                        profile.display_name.clone()
                    },
                    age_category: profile.age_category,
                    participation_format: profile.participation_format,
                    specialty: profile.specialty,
                    description: profile.description.clone(),
                    is_active: existing.map(|u| u.is_active).unwrap_or(true),
                    created_at: existing
                        .map(|u| u.created_at.clone())
                        .unwrap_or_else(now_rfc3339),
                };
                users.insert(key.clone(), user.clone());
                Ok(Apply::Commit(user))
            })
            .await?;

        tracing::info!(user_id = user.user_id, is_active = user.is_active, "User saved");
        Ok(user)
    }

    /// Returns `false` if the user has no profile.
    pub async fn set_user_active(&self, user_id: UserId, is_active: bool) -> Result<bool, AppError> {
        let key = User::storage_key(user_id);
        let found = self
            .update(Collection::Users, |users: &mut BTreeMap<String, User>| {
                match users.get_mut(&key) {
                    Some(user) => {
                        user.is_active = is_active;
                        Ok(Apply::Commit(true))
                    }
                    None => Ok(Apply::Skip(false)),
                }
            })
            .await?;

        if found {
            tracing::info!(user_id, is_active, "User visibility changed");
        }
        Ok(found)
    }

    /// Active users, oldest profile first.
    pub async fn get_active_users(&self) -> Result<Vec<User>, AppError> {
        let mut active: Vec<User> = self
            .get_users()
            .await?
            .into_values()
            .filter(|u| u.is_active)
            .collect();
        active.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(active)
    }

    /// Active users, optionally restricted to one specialty.
    pub async fn get_active_users_by_specialty(
        &self,
        specialty: Option<Specialty>,
    ) -> Result<Vec<User>, AppError> {
        let active = self.get_active_users().await?;
        Ok(match specialty {
            Some(spec) => active.into_iter().filter(|u| u.specialty == spec).collect(),
            None => active,
        })
    }

    // ─── Team Operations ─────────────────────────────────────────

    pub async fn get_teams(&self) -> Result<BTreeMap<String, Team>, AppError> {
        self.read_all(Collection::Teams).await
    }

    pub async fn get_team(&self, owner_id: UserId) -> Result<Option<Team>, AppError> {
        Ok(self.get_teams().await?.remove(&Team::storage_key(owner_id)))
    }

    /// Teams that are not paused, ordered by team number.
    pub async fn get_active_teams(&self) -> Result<Vec<Team>, AppError> {
        let mut active: Vec<Team> = self
            .get_teams()
            .await?
            .into_values()
            .filter(Team::is_active)
            .collect();
        active.sort_by_key(|t| t.team_number);
        Ok(active)
    }

    /// Create or overwrite the owner's team.
    ///
    /// A team number is assigned only on first creation. Numbers are taken
    /// from a persisted high-water mark so that a number freed by deletion
    /// is never handed out again. `is_paused`, `members` and `created_at`
    /// survive edits.
    pub async fn save_team(&self, profile: &TeamProfile) -> Result<Team, AppError> {
        let key = Team::storage_key(profile.owner_id);
        let _guard = self.locks.get(Collection::Teams).lock().await;

        let mut teams: BTreeMap<String, Team> = self.load(Collection::Teams).await?;
        let existing = teams.get(&key).cloned();

        let team_number = match &existing {
            Some(team) => team.team_number,
            None => {
                let mut sequences: BTreeMap<String, u32> = self.load(Collection::Sequences).await?;
                let max_existing = teams.values().map(|t| t.team_number).max().unwrap_or(0);
                let high_water = sequences.get(TEAM_NUMBER_SEQUENCE).copied().unwrap_or(0);
                let next = max_existing.max(high_water) + 1;
                sequences.insert(TEAM_NUMBER_SEQUENCE.to_string(), next);
                // Burn the number before the team exists; a failed team
                // write leaves a gap, never a duplicate.
                self.save(Collection::Sequences, sequences).await?;
                next
            }
        };

        let team = Team {
            owner_id: profile.owner_id,
            owner_username: profile.owner_username.clone(),
            team_number,
            team_name: profile.team_name.clone(),
            description: profile.description.clone(),
            roles_needed: profile.roles.clone(),
            pitch_format: profile.pitch_format,
            is_paused: existing.as_ref().map(|t| t.is_paused).unwrap_or(false),
            members: existing
                .as_ref()
                .map(|t| t.members.clone())
                .unwrap_or_default(),
            created_at: existing
                .as_ref()
                .map(|t| t.created_at.clone())
                .unwrap_or_else(now_rfc3339),
        };
        teams.insert(key, team.clone());
        self.save(Collection::Teams, teams).await?;

        tracing::info!(
            owner_id = team.owner_id,
            team_number = team.team_number,
            created = existing.is_none(),
            "Team saved"
        );
        Ok(team)
    }

    /// Hard-delete the owner's team. Requests and invites are kept.
    pub async fn delete_team(&self, owner_id: UserId) -> Result<bool, AppError> {
        let key = Team::storage_key(owner_id);
        let deleted = self
            .update(Collection::Teams, |teams: &mut BTreeMap<String, Team>| {
                Ok(match teams.remove(&key) {
                    Some(_) => Apply::Commit(true),
                    None => Apply::Skip(false),
                })
            })
            .await?;

        if deleted {
            tracing::info!(owner_id, "Team deleted");
        }
        Ok(deleted)
    }

    /// Flip `is_paused`. Returns the new value, or `None` if there is no team.
    pub async fn toggle_team_pause(&self, owner_id: UserId) -> Result<Option<bool>, AppError> {
        let key = Team::storage_key(owner_id);
        let paused = self
            .update(Collection::Teams, |teams: &mut BTreeMap<String, Team>| {
                Ok(match teams.get_mut(&key) {
                    Some(team) => {
                        team.is_paused = !team.is_paused;
                        Apply::Commit(Some(team.is_paused))
                    }
                    None => Apply::Skip(None),
                })
            })
            .await?;

        if let Some(is_paused) = paused {
            tracing::info!(owner_id, is_paused, "Team pause toggled");
        }
        Ok(paused)
    }

    // ─── Request Operations ──────────────────────────────────────

    pub async fn get_requests(&self) -> Result<BTreeMap<String, JoinRequest>, AppError> {
        self.read_all(Collection::Requests).await
    }

    pub async fn get_request(&self, request_id: &str) -> Result<Option<JoinRequest>, AppError> {
        Ok(self.get_requests().await?.remove(request_id))
    }

    /// Create a pending request.
    ///
    /// Returns `None` if a pending request for the same pair already exists.
    pub async fn create_request(
        &self,
        solo_id: UserId,
        team_owner_id: UserId,
    ) -> Result<Option<JoinRequest>, AppError> {
        let created = self
            .update(
                Collection::Requests,
                |requests: &mut BTreeMap<String, JoinRequest>| {
                    let duplicate = requests
                        .values()
                        .any(|r| r.is_between(solo_id, team_owner_id) && r.is_pending());
                    if duplicate {
                        return Ok(Apply::Skip(None));
                    }

                    let base = format!(
                        "{}_{}_{}",
                        solo_id,
                        team_owner_id,
                        chrono::Utc::now().timestamp()
                    );
                    let request_id = mint_key(requests, base);
                    let request = JoinRequest {
                        request_id: request_id.clone(),
                        solo_id,
                        team_owner_id,
                        status: DecisionStatus::Pending,
                        created_at: now_rfc3339(),
                    };
                    requests.insert(request_id, request.clone());
                    Ok(Apply::Commit(Some(request)))
                },
            )
            .await?;

        match &created {
            Some(request) => {
                tracing::info!(request_id = %request.request_id, solo_id, team_owner_id, "Request created")
            }
            None => tracing::debug!(solo_id, team_owner_id, "Duplicate pending request rejected"),
        }
        Ok(created)
    }

    /// Most recent request for the pair, by creation time.
    pub async fn get_request_by_solo_and_team(
        &self,
        solo_id: UserId,
        team_owner_id: UserId,
    ) -> Result<Option<JoinRequest>, AppError> {
        Ok(self
            .get_requests()
            .await?
            .into_values()
            .filter(|r| r.is_between(solo_id, team_owner_id))
            .max_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.request_id.cmp(&b.request_id))
            }))
    }

    /// Pending requests addressed to a team, oldest first.
    pub async fn get_pending_requests_for_team(
        &self,
        team_owner_id: UserId,
    ) -> Result<Vec<JoinRequest>, AppError> {
        let mut pending: Vec<JoinRequest> = self
            .get_requests()
            .await?
            .into_values()
            .filter(|r| r.team_owner_id == team_owner_id && r.is_pending())
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    /// Set a status unconditionally. Returns `false` for an unknown id.
    ///
    /// Callers wanting the pending -> terminal rule use [`Self::transition_request`].
    pub async fn update_request_status(
        &self,
        request_id: &str,
        status: DecisionStatus,
    ) -> Result<bool, AppError> {
        self.update(
            Collection::Requests,
            |requests: &mut BTreeMap<String, JoinRequest>| {
                Ok(match requests.get_mut(request_id) {
                    Some(request) => {
                        request.status = status;
                        Apply::Commit(true)
                    }
                    None => Apply::Skip(false),
                })
            },
        )
        .await
    }

    /// Apply a decision to a request, atomically with the status check.
    pub async fn transition_request(
        &self,
        request_id: &str,
        event: DecisionEvent,
    ) -> Result<JoinRequest, AppError> {
        let request = self
            .update(
                Collection::Requests,
                |requests: &mut BTreeMap<String, JoinRequest>| {
                    let request = requests
                        .get_mut(request_id)
                        .ok_or_else(|| AppError::NotFound(format!("request {request_id}")))?;
                    request.status = DecisionStateMachine::transition(request.status, event)?;
                    Ok(Apply::Commit(request.clone()))
                },
            )
            .await?;

        tracing::info!(request_id, status = %request.status, "Request decided");
        Ok(request)
    }

    // ─── Invite Operations ───────────────────────────────────────

    pub async fn get_invites(&self) -> Result<BTreeMap<String, Invite>, AppError> {
        self.read_all(Collection::Invites).await
    }

    pub async fn get_invite(&self, invite_id: &str) -> Result<Option<Invite>, AppError> {
        Ok(self.get_invites().await?.remove(invite_id))
    }

    /// Create a pending invite.
    ///
    /// Returns `None` if a pending invite for the same pair already exists.
    pub async fn create_invite(
        &self,
        team_owner_id: UserId,
        solo_id: UserId,
    ) -> Result<Option<Invite>, AppError> {
        let created = self
            .update(Collection::Invites, |invites: &mut BTreeMap<String, Invite>| {
                let duplicate = invites
                    .values()
                    .any(|i| i.is_between(team_owner_id, solo_id) && i.is_pending());
                if duplicate {
                    return Ok(Apply::Skip(None));
                }

                let base = format!(
                    "inv_{}_{}_{}",
                    team_owner_id,
                    solo_id,
                    chrono::Utc::now().timestamp()
                );
                let invite_id = mint_key(invites, base);
                let invite = Invite {
                    invite_id: invite_id.clone(),
                    team_owner_id,
                    solo_id,
                    status: DecisionStatus::Pending,
                    created_at: now_rfc3339(),
                };
                invites.insert(invite_id, invite.clone());
                Ok(Apply::Commit(Some(invite)))
            })
            .await?;

        match &created {
            Some(invite) => {
                tracing::info!(invite_id = %invite.invite_id, team_owner_id, solo_id, "Invite created")
            }
            None => tracing::debug!(team_owner_id, solo_id, "Duplicate pending invite rejected"),
        }
        Ok(created)
    }

    /// Most recent invite for the pair, by creation time.
    pub async fn get_invite_by_team_and_solo(
        &self,
        team_owner_id: UserId,
        solo_id: UserId,
    ) -> Result<Option<Invite>, AppError> {
        Ok(self
            .get_invites()
            .await?
            .into_values()
            .filter(|i| i.is_between(team_owner_id, solo_id))
            .max_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.invite_id.cmp(&b.invite_id))
            }))
    }

    /// Pending invites addressed to a solo, oldest first.
    pub async fn get_pending_invites_for_solo(
        &self,
        solo_id: UserId,
    ) -> Result<Vec<Invite>, AppError> {
        let mut pending: Vec<Invite> = self
            .get_invites()
            .await?
            .into_values()
            .filter(|i| i.solo_id == solo_id && i.is_pending())
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    /// Set a status unconditionally. Returns `false` for an unknown id.
    pub async fn update_invite_status(
        &self,
        invite_id: &str,
        status: DecisionStatus,
    ) -> Result<bool, AppError> {
        self.update(Collection::Invites, |invites: &mut BTreeMap<String, Invite>| {
            Ok(match invites.get_mut(invite_id) {
                Some(invite) => {
                    invite.status = status;
                    Apply::Commit(true)
                }
                None => Apply::Skip(false),
            })
        })
        .await
    }

    /// Apply a decision to an invite, atomically with the status check.
    pub async fn transition_invite(
        &self,
        invite_id: &str,
        event: DecisionEvent,
    ) -> Result<Invite, AppError> {
        let invite = self
            .update(Collection::Invites, |invites: &mut BTreeMap<String, Invite>| {
                let invite = invites
                    .get_mut(invite_id)
                    .ok_or_else(|| AppError::NotFound(format!("invite {invite_id}")))?;
                invite.status = DecisionStateMachine::transition(invite.status, event)?;
                Ok(Apply::Commit(invite.clone()))
            })
            .await?;

        tracing::info!(invite_id, status = %invite.status, "Invite decided");
        Ok(invite)
    }

    // ─── Stats ───────────────────────────────────────────────────

    pub async fn admin_stats(&self) -> Result<AdminStats, AppError> {
        let mut stats = AdminStats::default();
        self.get_teams()
            .await?
            .values()
            .for_each(|t| stats.add_team(t));
        self.get_users()
            .await?
            .values()
            .for_each(|u| stats.add_user(u));
        self.get_requests()
            .await?
            .values()
            .for_each(|r| stats.add_request(r));
        self.get_invites()
            .await?
            .values()
            .for_each(|i| stats.add_invite(i));
        Ok(stats)
    }
}

/// `base`, or `base_{n}` with the smallest free `n >= 2`.
fn mint_key<T>(records: &BTreeMap<String, T>, base: String) -> String {
    if !records.contains_key(&base) {
        return base;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}_{n}");
        if !records.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
