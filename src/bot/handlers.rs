// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat handlers: one function per command, button, or form step.

use super::callback::{BotMode, CallbackAction};
use super::dialogue::{Dialogue, SoloForm, TeamForm};
use super::{keyboards, texts};
use crate::error::AppError;
use crate::models::{Specialty, UserId, MIN_DESCRIPTION_CHARS, MIN_NAME_CHARS};
use crate::services::matching::BrowseResult;
use crate::services::telegram::{InlineKeyboardMarkup, TgUser};
use crate::AppState;

/// Short confirmation shown as a toast when a button handler succeeds.
pub type Toast = Option<&'static str>;

/// Where a handler renders its reply.
pub struct ChatContext<'a> {
    pub state: &'a AppState,
    pub chat_id: i64,
    pub user: &'a TgUser,
    /// Message carrying the pressed button; replies edit it in place
    pub message_id: Option<i64>,
}

impl ChatContext<'_> {
    fn user_id(&self) -> UserId {
        self.user.id
    }

    fn username(&self) -> Option<String> {
        self.user.username.clone()
    }

    /// Edit the button's message, or send a new one for typed input.
    async fn show(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<(), AppError> {
        match self.message_id {
            Some(message_id) => {
                self.state
                    .telegram
                    .edit_message_text(self.chat_id, message_id, text, keyboard)
                    .await
            }
            None => {
                self.state
                    .telegram
                    .send_message(self.chat_id, text, keyboard)
                    .await
            }
        }
    }

    fn dialogue(&self) -> Option<Dialogue> {
        self.state.dialogues.get(self.chat_id)
    }

    fn set_dialogue(&self, dialogue: Dialogue) {
        self.state.dialogues.set(self.chat_id, dialogue);
    }

    fn clear_dialogue(&self) -> bool {
        self.state.dialogues.clear(self.chat_id)
    }

    fn ignore_out_of_step(&self, action: &CallbackAction) -> Result<Toast, AppError> {
        tracing::debug!(
            chat_id = self.chat_id,
            action = %action,
            "Button does not match the current form step"
        );
        Ok(None)
    }
}

// ─── Commands ────────────────────────────────────────────────

pub async fn handle_command(ctx: &ChatContext<'_>, command: &str) -> Result<(), AppError> {
    match command {
        "/start" => {
            ctx.clear_dialogue();
            ctx.show(texts::GREETING, Some(&keyboards::mode_menu())).await
        }
        "/cancel" => {
            let text = if ctx.clear_dialogue() {
                texts::CANCELLED
            } else {
                texts::NOTHING_TO_CANCEL
            };
            ctx.show(text, None).await
        }
        "/stats" | "/admin" => {
            let stats = ctx.state.matchmaking.admin_stats(ctx.user_id()).await?;
            ctx.show(&texts::admin_stats(&stats), None).await
        }
        _ => ctx.show(texts::HELP, None).await,
    }
}

// ─── Typed form input ────────────────────────────────────────

fn too_short(text: &str, min_chars: usize) -> bool {
    text.chars().count() < min_chars
}

pub async fn handle_text(ctx: &ChatContext<'_>, text: &str) -> Result<(), AppError> {
    let text = text.trim();
    let Some(dialogue) = ctx.dialogue() else {
        return ctx.show(texts::HELP, None).await;
    };

    match dialogue {
        Dialogue::Solo(form @ SoloForm::DisplayName) => {
            if too_short(text, MIN_NAME_CHARS) {
                return ctx.show(texts::NAME_TOO_SHORT, None).await;
            }
            if let Some(next) = form.with_name(text) {
                ctx.set_dialogue(Dialogue::Solo(next));
            }
            ctx.show(texts::ASK_AGE, Some(&keyboards::age())).await
        }
        Dialogue::Solo(form @ SoloForm::Description { .. }) => {
            if too_short(text, MIN_DESCRIPTION_CHARS) {
                return ctx.show(texts::DESCRIPTION_TOO_SHORT, None).await;
            }
            let Some(profile) = form.finish(ctx.user_id(), ctx.username(), text) else {
                return Ok(());
            };
            let user = ctx.state.matchmaking.submit_solo_profile(profile).await?;
            ctx.clear_dialogue();
            ctx.show(texts::SOLO_SAVED, Some(&keyboards::solo_menu(Some(&user))))
                .await
        }
        Dialogue::Team(form @ TeamForm::Name) => {
            if too_short(text, MIN_NAME_CHARS) {
                return ctx.show(texts::TEAM_NAME_TOO_SHORT, None).await;
            }
            if let Some(next) = form.with_name(Some(text)) {
                ctx.set_dialogue(Dialogue::Team(next));
            }
            ctx.show(texts::ASK_PITCH, Some(&keyboards::pitch_format()))
                .await
        }
        Dialogue::Team(form @ TeamForm::Description { .. }) => {
            if too_short(text, MIN_DESCRIPTION_CHARS) {
                return ctx.show(texts::DESCRIPTION_TOO_SHORT, None).await;
            }
            if let Some(next) = form.with_description(text) {
                ctx.set_dialogue(Dialogue::Team(next));
            }
            ctx.show(texts::ASK_ROLES, Some(&keyboards::roles(&[])))
                .await
        }
        Dialogue::Solo(_) | Dialogue::Team(_) => ctx.show(texts::USE_BUTTONS, None).await,
    }
}

// ─── Buttons ─────────────────────────────────────────────────

pub async fn handle_callback(
    ctx: &ChatContext<'_>,
    action: CallbackAction,
) -> Result<Toast, AppError> {
    use CallbackAction as A;

    match action {
        A::Start => {
            ctx.clear_dialogue();
            ctx.show(texts::GREETING, Some(&keyboards::mode_menu())).await?;
            Ok(None)
        }
        A::Mode(BotMode::Solo) => show_solo_menu(ctx).await,
        A::Mode(BotMode::Team) => show_team_menu(ctx).await,

        A::Age(age) => match ctx.dialogue().and_then(|d| solo_step(d, |f| f.with_age(age))) {
            Some(next) => {
                ctx.set_dialogue(Dialogue::Solo(next));
                ctx.show(texts::ASK_FORMAT, Some(&keyboards::participation_format()))
                    .await?;
                Ok(None)
            }
            None => ctx.ignore_out_of_step(&action),
        },
        A::Format(format) => match ctx.dialogue().and_then(|d| solo_step(d, |f| f.with_format(format))) {
            Some(next) => {
                ctx.set_dialogue(Dialogue::Solo(next));
                ctx.show(texts::ASK_SPECIALTY, Some(&keyboards::specialty()))
                    .await?;
                Ok(None)
            }
            None => ctx.ignore_out_of_step(&action),
        },
        A::Specialty(specialty) => {
            match ctx
                .dialogue()
                .and_then(|d| solo_step(d, |f| f.with_specialty(specialty)))
            {
                Some(next) => {
                    ctx.set_dialogue(Dialogue::Solo(next));
                    ctx.show(texts::ASK_SOLO_DESCRIPTION, None).await?;
                    Ok(None)
                }
                None => ctx.ignore_out_of_step(&action),
            }
        }

        A::TeamNameSkip => match ctx.dialogue().and_then(|d| team_step(d, |f| f.with_name(None))) {
            Some(next) => {
                ctx.set_dialogue(Dialogue::Team(next));
                ctx.show(texts::ASK_PITCH, Some(&keyboards::pitch_format()))
                    .await?;
                Ok(None)
            }
            None => ctx.ignore_out_of_step(&action),
        },
        A::Pitch(pitch) => match ctx.dialogue().and_then(|d| team_step(d, |f| f.with_pitch(pitch))) {
            Some(next) => {
                ctx.set_dialogue(Dialogue::Team(next));
                ctx.show(texts::ASK_TEAM_DESCRIPTION, None).await?;
                Ok(None)
            }
            None => ctx.ignore_out_of_step(&action),
        },
        A::Role(role) => match ctx.dialogue().and_then(|d| team_step(d, |f| f.toggle_role(role))) {
            Some(next) => {
                let markup = keyboards::roles(next.selected_roles());
                ctx.set_dialogue(Dialogue::Team(next));
                ctx.show(texts::ASK_ROLES, Some(&markup)).await?;
                Ok(None)
            }
            None => ctx.ignore_out_of_step(&action),
        },
        A::RolesDone => finish_team_form(ctx, &action).await,

        A::SoloBrowse(page) => {
            ctx.clear_dialogue();
            browse_teams(ctx, page).await
        }
        A::Browse(page) => browse_teams(ctx, page).await,
        A::CloseProfile | A::OpenProfile => {
            let is_active = matches!(action, A::OpenProfile);
            ctx.state
                .matchmaking
                .set_solo_active(ctx.user_id(), is_active)
                .await?;
            let user = ctx.state.db.get_user(ctx.user_id()).await?;
            let text = if is_active {
                texts::SOLO_OPENED
            } else {
                texts::SOLO_CLOSED
            };
            ctx.show(text, Some(&keyboards::solo_menu(user.as_ref())))
                .await?;
            Ok(None)
        }
        A::SoloInvites => show_pending_invites(ctx).await,
        A::Request(team_owner_id) => {
            ctx.state
                .matchmaking
                .send_request(ctx.user_id(), team_owner_id)
                .await?;
            let user = ctx.state.db.get_user(ctx.user_id()).await?;
            ctx.show(texts::REQUEST_SENT, Some(&keyboards::solo_menu(user.as_ref())))
                .await?;
            Ok(Some("Request sent!"))
        }
        A::InviteAccept(ref invite_id) | A::InviteDeny(ref invite_id) => {
            let accepted = matches!(action, A::InviteAccept(_));
            let matchmaking = &ctx.state.matchmaking;
            let invite = if accepted {
                matchmaking.accept_invite(invite_id, ctx.user_id()).await?
            } else {
                matchmaking.deny_invite(invite_id, ctx.user_id()).await?
            };
            let team_name = ctx
                .state
                .db
                .get_team(invite.team_owner_id)
                .await?
                .map(|t| t.display_name())
                .unwrap_or_else(|| "the team".to_string());
            ctx.show(&texts::invite_decided(accepted, &team_name), None)
                .await?;
            Ok(None)
        }

        A::TeamRequests => show_pending_requests(ctx).await,
        A::TeamSearchSolos => {
            ctx.show(texts::FILTER_PROMPT, Some(&keyboards::specialty_filter(None)))
                .await?;
            Ok(None)
        }
        A::SoloFilter(filter) => browse_solos(ctx, filter, 0).await,
        A::SoloBrowseFiltered(filter, page) => browse_solos(ctx, filter, page).await,
        A::Invite(solo_id) => {
            ctx.state
                .matchmaking
                .send_invite(ctx.user_id(), solo_id)
                .await?;
            ctx.show(texts::INVITE_SENT, Some(&keyboards::back_to_search()))
                .await?;
            Ok(Some("Invite sent."))
        }
        A::Accept(ref request_id) | A::Deny(ref request_id) => {
            let accepted = matches!(action, A::Accept(_));
            let matchmaking = &ctx.state.matchmaking;
            let request = if accepted {
                matchmaking.accept_request(request_id, ctx.user_id()).await?
            } else {
                matchmaking.deny_request(request_id, ctx.user_id()).await?
            };
            let contact = ctx
                .state
                .db
                .get_user(request.solo_id)
                .await?
                .map(|u| u.contact())
                .unwrap_or_else(|| format!("ID: {}", request.solo_id));
            ctx.show(&texts::request_decided(accepted, &contact), None)
                .await?;
            Ok(None)
        }
        A::TeamTogglePause => {
            let is_paused = ctx.state.matchmaking.toggle_team_pause(ctx.user_id()).await?;
            ctx.show(
                texts::pause_toggled(is_paused),
                Some(&keyboards::team_dashboard(is_paused)),
            )
            .await?;
            Ok(None)
        }
        A::TeamDeleteConfirm => {
            ctx.show(texts::CONFIRM_DELETE, Some(&keyboards::confirm_delete_team()))
                .await?;
            Ok(None)
        }
        A::TeamDeleteYes => {
            ctx.state.matchmaking.delete_team(ctx.user_id()).await?;
            ctx.clear_dialogue();
            ctx.show(texts::GREETING, Some(&keyboards::mode_menu())).await?;
            Ok(Some(texts::TEAM_DELETED))
        }
        A::TeamDeleteNo => show_team_menu(ctx).await,
    }
}

fn solo_step(dialogue: Dialogue, step: impl FnOnce(&SoloForm) -> Option<SoloForm>) -> Option<SoloForm> {
    match dialogue {
        Dialogue::Solo(form) => step(&form),
        Dialogue::Team(_) => None,
    }
}

fn team_step(dialogue: Dialogue, step: impl FnOnce(&TeamForm) -> Option<TeamForm>) -> Option<TeamForm> {
    match dialogue {
        Dialogue::Team(form) => step(&form),
        Dialogue::Solo(_) => None,
    }
}

/// Solo menu for an existing profile, otherwise start the questionnaire.
async fn show_solo_menu(ctx: &ChatContext<'_>) -> Result<Toast, AppError> {
    match ctx.state.db.get_user(ctx.user_id()).await? {
        Some(user) => {
            ctx.clear_dialogue();
            ctx.show(&texts::solo_menu(&user), Some(&keyboards::solo_menu(Some(&user))))
                .await?;
        }
        None => {
            ctx.set_dialogue(Dialogue::Solo(SoloForm::DisplayName));
            ctx.show(texts::ASK_DISPLAY_NAME, None).await?;
        }
    }
    Ok(None)
}

/// Team dashboard for an existing team, otherwise start the questionnaire.
async fn show_team_menu(ctx: &ChatContext<'_>) -> Result<Toast, AppError> {
    match ctx.state.db.get_team(ctx.user_id()).await? {
        Some(team) => {
            ctx.clear_dialogue();
            ctx.show(
                &texts::team_dashboard(&team),
                Some(&keyboards::team_dashboard(team.is_paused)),
            )
            .await?;
        }
        None => {
            ctx.set_dialogue(Dialogue::Team(TeamForm::Name));
            ctx.show(texts::ASK_TEAM_NAME, Some(&keyboards::team_name_skip()))
                .await?;
        }
    }
    Ok(None)
}

async fn finish_team_form(ctx: &ChatContext<'_>, action: &CallbackAction) -> Result<Toast, AppError> {
    let Some(Dialogue::Team(form)) = ctx.dialogue() else {
        return ctx.ignore_out_of_step(action);
    };
    if form.selected_roles().is_empty() {
        return Err(AppError::Validation(texts::PICK_A_ROLE.to_string()));
    }
    let Some(profile) = form.finish(ctx.user_id(), ctx.username()) else {
        return ctx.ignore_out_of_step(action);
    };

    let team = ctx.state.matchmaking.submit_team_profile(profile).await?;
    ctx.clear_dialogue();
    ctx.show(
        texts::TEAM_SAVED,
        Some(&keyboards::team_dashboard(team.is_paused)),
    )
    .await?;
    Ok(None)
}

async fn browse_teams(ctx: &ChatContext<'_>, page: i64) -> Result<Toast, AppError> {
    match ctx.state.matchmaking.browse_active_teams(page).await? {
        BrowseResult::Empty => {
            let user = ctx.state.db.get_user(ctx.user_id()).await?;
            ctx.show(
                texts::NO_ACTIVE_TEAMS,
                Some(&keyboards::solo_menu(user.as_ref())),
            )
            .await?;
        }
        BrowseResult::Page(page) => {
            ctx.show(&texts::team_card(&page), Some(&keyboards::team_card(&page)))
                .await?;
        }
    }
    Ok(None)
}

async fn browse_solos(
    ctx: &ChatContext<'_>,
    filter: Option<Specialty>,
    page: i64,
) -> Result<Toast, AppError> {
    match ctx.state.matchmaking.browse_active_solos(filter, page).await? {
        BrowseResult::Empty => {
            ctx.show(texts::NO_ACTIVE_SOLOS, Some(&keyboards::back_to_search()))
                .await?;
        }
        BrowseResult::Page(page) => {
            ctx.show(
                &texts::solo_card(&page),
                Some(&keyboards::solo_card(&page, filter)),
            )
            .await?;
        }
    }
    Ok(None)
}

/// Oldest pending request first; deciding it reveals the next one.
async fn show_pending_requests(ctx: &ChatContext<'_>) -> Result<Toast, AppError> {
    let pending = ctx
        .state
        .matchmaking
        .pending_requests_for_team(ctx.user_id())
        .await?;
    match pending.first() {
        None => {
            ctx.show(texts::NO_REQUESTS, Some(&keyboards::back_to_team_menu()))
                .await?;
        }
        Some(first) => {
            ctx.show(
                &texts::pending_request(first.solo.as_ref(), pending.len()),
                Some(&keyboards::request_decision(&first.request.request_id)),
            )
            .await?;
        }
    }
    Ok(None)
}

async fn show_pending_invites(ctx: &ChatContext<'_>) -> Result<Toast, AppError> {
    let pending = ctx
        .state
        .matchmaking
        .pending_invites_for_solo(ctx.user_id())
        .await?;
    match pending.first() {
        None => {
            ctx.show(texts::NO_INVITES, Some(&keyboards::back_to_solo_menu()))
                .await?;
        }
        Some(first) => {
            ctx.show(
                &texts::pending_invite(first.team.as_ref(), pending.len()),
                Some(&keyboards::invite_decision(&first.invite.invite_id)),
            )
            .await?;
        }
    }
    Ok(None)
}
