// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inline keyboards.

use super::callback::{BotMode, CallbackAction, MAX_CALLBACK_DATA_LEN};
use crate::models::{AgeCategory, ParticipationFormat, Role, Specialty, Team, User};
use crate::services::matching::Page;
use crate::services::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    let data = action.encode();
    if data.len() > MAX_CALLBACK_DATA_LEN {
        tracing::warn!(
            data = %data,
            len = data.len(),
            "Callback data exceeds Telegram limit"
        );
    }
    InlineKeyboardButton::callback(text, data)
}

fn single_column(buttons: impl IntoIterator<Item = InlineKeyboardButton>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(buttons.into_iter().map(|b| vec![b]).collect())
}

fn checked(label: &str, is_checked: bool) -> String {
    if is_checked {
        format!("\u{2713} {label}")
    } else {
        label.to_string()
    }
}

/// Prev/next row; empty when there is only one page.
fn nav_row<T>(page: &Page<T>, to: impl Fn(i64) -> CallbackAction) -> Vec<InlineKeyboardButton> {
    let index = page.index as i64;
    let mut row = Vec::new();
    if page.has_prev() {
        row.push(button("\u{2190} Back", to(index - 1)));
    }
    if page.has_next() {
        row.push(button("Next \u{2192}", to(index + 1)));
    }
    row
}

pub fn mode_menu() -> InlineKeyboardMarkup {
    single_column([
        button("I'm looking for a team", CallbackAction::Mode(BotMode::Solo)),
        button(
            "We're a team looking for people",
            CallbackAction::Mode(BotMode::Team),
        ),
    ])
}

// ─── Solo form ───────────────────────────────────────────────

pub fn age() -> InlineKeyboardMarkup {
    single_column(
        AgeCategory::ALL
            .into_iter()
            .map(|a| button(a.label(), CallbackAction::Age(a))),
    )
}

pub fn participation_format() -> InlineKeyboardMarkup {
    single_column(
        ParticipationFormat::ALL
            .into_iter()
            .map(|f| button(f.label(), CallbackAction::Format(f))),
    )
}

pub fn specialty() -> InlineKeyboardMarkup {
    single_column(
        Specialty::ALL
            .into_iter()
            .map(|s| button(s.label(), CallbackAction::Specialty(s))),
    )
}

// ─── Team form ───────────────────────────────────────────────

pub fn team_name_skip() -> InlineKeyboardMarkup {
    single_column([button("No name", CallbackAction::TeamNameSkip)])
}

pub fn pitch_format() -> InlineKeyboardMarkup {
    single_column(
        ParticipationFormat::ALL
            .into_iter()
            .map(|f| button(f.label(), CallbackAction::Pitch(f))),
    )
}

pub fn roles(selected: &[Role]) -> InlineKeyboardMarkup {
    single_column(
        Role::ALL
            .into_iter()
            .map(|r| button(checked(r.label(), selected.contains(&r)), CallbackAction::Role(r)))
            .chain([button("Done", CallbackAction::RolesDone)]),
    )
}

// ─── Solo views ──────────────────────────────────────────────

pub fn solo_menu(user: Option<&User>) -> InlineKeyboardMarkup {
    let is_active = user.map_or(true, |u| u.is_active);
    let visibility = if is_active {
        button("Close my profile", CallbackAction::CloseProfile)
    } else {
        button("Reopen my profile", CallbackAction::OpenProfile)
    };
    single_column([
        button("Browse teams", CallbackAction::SoloBrowse(0)),
        button("My invites", CallbackAction::SoloInvites),
        visibility,
        button("Main menu", CallbackAction::Start),
    ])
}

pub fn team_card(page: &Page<Team>) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![button(
        "Send request",
        CallbackAction::Request(page.item.owner_id),
    )]];
    let nav = nav_row(page, CallbackAction::Browse);
    if !nav.is_empty() {
        rows.push(nav);
    }
    rows.push(vec![button("Menu", CallbackAction::Mode(BotMode::Solo))]);
    InlineKeyboardMarkup::new(rows)
}

pub fn invite_decision(invite_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("Accept", CallbackAction::InviteAccept(invite_id.to_string())),
        button("Decline", CallbackAction::InviteDeny(invite_id.to_string())),
    ]])
}

pub fn back_to_solo_menu() -> InlineKeyboardMarkup {
    single_column([button("Menu", CallbackAction::Mode(BotMode::Solo))])
}

// ─── Team views ──────────────────────────────────────────────

pub fn team_dashboard(is_paused: bool) -> InlineKeyboardMarkup {
    let pause = if is_paused {
        "Resume search"
    } else {
        "Close search"
    };
    single_column([
        button("New requests", CallbackAction::TeamRequests),
        button("Search people", CallbackAction::TeamSearchSolos),
        button(pause, CallbackAction::TeamTogglePause),
        button("Delete team profile", CallbackAction::TeamDeleteConfirm),
        button("Main menu", CallbackAction::Start),
    ])
}

pub fn request_decision(request_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("Accept", CallbackAction::Accept(request_id.to_string())),
        button("Decline", CallbackAction::Deny(request_id.to_string())),
    ]])
}

pub fn specialty_filter(current: Option<Specialty>) -> InlineKeyboardMarkup {
    single_column(
        [button(
            checked("All specialties", current.is_none()),
            CallbackAction::SoloFilter(None),
        )]
        .into_iter()
        .chain(Specialty::ALL.into_iter().map(|s| {
            button(
                checked(s.label(), current == Some(s)),
                CallbackAction::SoloFilter(Some(s)),
            )
        }))
        .chain([button("Team menu", CallbackAction::Mode(BotMode::Team))]),
    )
}

pub fn solo_card(page: &Page<User>, filter: Option<Specialty>) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![button(
        "Invite to team",
        CallbackAction::Invite(page.item.user_id),
    )]];
    let nav = nav_row(page, |p| CallbackAction::SoloBrowseFiltered(filter, p));
    if !nav.is_empty() {
        rows.push(nav);
    }
    rows.push(vec![
        button("\u{2190} Filter", CallbackAction::TeamSearchSolos),
        button("Menu", CallbackAction::Mode(BotMode::Team)),
    ]);
    InlineKeyboardMarkup::new(rows)
}

pub fn back_to_search() -> InlineKeyboardMarkup {
    single_column([
        button("\u{2190} Back to search", CallbackAction::TeamSearchSolos),
        button("Team menu", CallbackAction::Mode(BotMode::Team)),
    ])
}

pub fn back_to_team_menu() -> InlineKeyboardMarkup {
    single_column([button("Team menu", CallbackAction::Mode(BotMode::Team))])
}

pub fn confirm_delete_team() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("Yes, delete", CallbackAction::TeamDeleteYes),
        button("No", CallbackAction::TeamDeleteNo),
    ]])
}
