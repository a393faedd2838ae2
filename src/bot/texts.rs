// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Message texts (HTML parse mode).
//!
//! Anything a user typed goes through [`escape_html`] before it is embedded.

use crate::error::AppError;
use crate::models::{AdminStats, Role, Team, User};
use crate::services::matching::Page;

pub const GREETING: &str = "Hi! I help game jam participants find a team.\n\nWhat are you looking for?";

pub const HELP: &str = "<b>Commands</b>\n\
/start - main menu\n\
/cancel - abandon the current form\n\
/help - this message";

pub const ASK_DISPLAY_NAME: &str = "What should we call you? (name or nickname)";
pub const ASK_AGE: &str = "Age category:";
pub const ASK_FORMAT: &str = "Participation format:";
pub const ASK_SPECIALTY: &str = "Specialty:";
pub const ASK_SOLO_DESCRIPTION: &str = "Describe your experience and portfolio: skills, past projects, what you want to work on. This helps teams find you.";
pub const NAME_TOO_SHORT: &str = "Please enter a name or nickname (at least 2 characters).";
pub const DESCRIPTION_TOO_SHORT: &str =
    "Please write a fuller description (at least 10 characters).";

pub const ASK_TEAM_NAME: &str = "What is your team called? (a short name, or press \"No name\")";
pub const TEAM_NAME_TOO_SHORT: &str =
    "Enter a name (at least 2 characters) or press \"No name\" above.";
pub const ASK_PITCH: &str = "Team pitch format:";
pub const ASK_TEAM_DESCRIPTION: &str = "Describe your team: concept, style, what you are building. This helps participants see whether you are a fit.";
pub const ASK_ROLES: &str = "Pick the roles your team needs (several allowed):";
pub const PICK_A_ROLE: &str = "Pick at least one role.";

pub const SOLO_SAVED: &str =
    "Profile saved! You can now browse teams and send requests.";
pub const SOLO_CLOSED: &str = "Profile closed. Teams no longer see you in search.";
pub const SOLO_OPENED: &str = "Profile is active again. Teams can find you in search.";
pub const NO_ACTIVE_TEAMS: &str = "No teams are searching right now. Check back later!";
pub const REQUEST_SENT: &str = "Request sent! The team has been notified.";
pub const NO_INVITES: &str = "You have no pending invites.";

pub const TEAM_SAVED: &str = "Team registered! Requests from participants will arrive here.";
pub const NO_REQUESTS: &str = "No new requests.";
pub const FILTER_PROMPT: &str = "Filter by specialty:";
pub const NO_ACTIVE_SOLOS: &str = "No active profiles match this filter.";
pub const INVITE_SENT: &str = "Invite sent. Waiting for an answer.";
pub const CONFIRM_DELETE: &str = "Really delete your team profile?";
pub const TEAM_DELETED: &str = "Team profile deleted.";
pub const USE_BUTTONS: &str = "Please use the buttons above.";
pub const CANCELLED: &str = "Cancelled. Send /start to begin again.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn roles_line(roles: &[Role]) -> String {
    if roles.is_empty() {
        return "-".to_string();
    }
    roles
        .iter()
        .map(Role::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn page_suffix<T>(page: &Page<T>) -> String {
    format!(" (page {}/{})", page.position(), page.total)
}

/// Team card shown while browsing.
pub fn team_card(page: &Page<Team>) -> String {
    let team = &page.item;
    format!(
        "<b>{}</b>{}\n\n{}\n\n<b>Looking for:</b> {}\n<b>Pitch:</b> {}",
        escape_html(&team.display_name()),
        page_suffix(page),
        escape_html(&team.description),
        roles_line(&team.roles_needed),
        team.pitch_format.label(),
    )
}

/// The owner's own view of their team.
pub fn team_dashboard(team: &Team) -> String {
    format!(
        "<b>{}</b>\n\n{}\n\n<b>Looking for:</b> {}\n<b>Pitch:</b> {}\n\nStatus: {}",
        escape_html(&team.display_name()),
        escape_html(&team.description),
        roles_line(&team.roles_needed),
        team.pitch_format.label(),
        if team.is_paused {
            "search closed"
        } else {
            "searching"
        },
    )
}

pub fn pause_toggled(is_paused: bool) -> &'static str {
    if is_paused {
        "Search closed. Your team is hidden from participants."
    } else {
        "Search resumed. Participants can see your team again."
    }
}

/// Solo card shown to teams while browsing.
pub fn solo_card(page: &Page<User>) -> String {
    let solo = &page.item;
    format!(
        "<b>{}</b>{}\nAge: {} | Format: {} | Specialty: {}\n\n{}",
        escape_html(solo.shown_name()),
        page_suffix(page),
        solo.age_category.label(),
        solo.participation_format.label(),
        solo.specialty.label(),
        escape_html(&solo.description),
    )
}

pub fn solo_menu(user: &User) -> String {
    format!(
        "<b>{}</b>, your profile is {}.",
        escape_html(user.shown_name()),
        if user.is_active {
            "visible to teams"
        } else {
            "closed"
        }
    )
}

/// Pending request as shown on the team's "new requests" view.
pub fn pending_request(solo: Option<&User>, remaining: usize) -> String {
    let body = match solo {
        Some(solo) => format!(
            "<b>Request</b> from {} ({})\n{}\n\n{}",
            escape_html(solo.shown_name()),
            escape_html(&solo.contact()),
            solo.specialty.label(),
            escape_html(&solo.description),
        ),
        None => "<b>Request</b> from a participant who no longer has a profile".to_string(),
    };
    if remaining > 1 {
        format!("{body}\n\n{} more waiting.", remaining - 1)
    } else {
        body
    }
}

/// Pending invite as shown on the solo's "my invites" view.
pub fn pending_invite(team: Option<&Team>, remaining: usize) -> String {
    let body = match team {
        Some(team) => format!(
            "<b>{}</b> invites you!\n\n{}\n\n<b>Looking for:</b> {}",
            escape_html(&team.display_name()),
            escape_html(&team.description),
            roles_line(&team.roles_needed),
        ),
        None => "<b>Invite</b> from a team that has since been deleted".to_string(),
    };
    if remaining > 1 {
        format!("{body}\n\n{} more waiting.", remaining - 1)
    } else {
        body
    }
}

// ─── Notifications ───────────────────────────────────────────

/// To the team owner when a solo applies.
pub fn new_request(solo: &User) -> String {
    format!(
        "New request from {} ({})\n{}\n\n{}",
        escape_html(solo.shown_name()),
        escape_html(&solo.contact()),
        solo.specialty.label(),
        escape_html(&solo.description),
    )
}

/// To the solo when the team accepts.
pub fn request_accepted(team_name: &str, owner_contact: &str) -> String {
    format!(
        "Congratulations! Team \u{ab}{}\u{bb} accepted your request. Contact: {}",
        escape_html(team_name),
        escape_html(owner_contact),
    )
}

/// To the solo when the team declines.
pub fn request_denied(team_name: &str) -> String {
    format!(
        "Team \u{ab}{}\u{bb} declined your request.",
        escape_html(team_name)
    )
}

/// To the owner after they decided a request.
pub fn request_decided(accepted: bool, solo_contact: &str) -> String {
    if accepted {
        format!("Request accepted. Contact: {}", escape_html(solo_contact))
    } else {
        "Request declined.".to_string()
    }
}

/// To the solo when a team invites them.
pub fn new_invite(team: &Team) -> String {
    format!(
        "Team \u{ab}{}\u{bb} invites you!\n\n{}",
        escape_html(&team.display_name()),
        escape_html(&team.description),
    )
}

/// To the owner when the solo accepts.
pub fn invite_accepted(solo_name: &str, solo_contact: &str) -> String {
    format!(
        "{} accepted your invite. Contact: {}",
        escape_html(solo_name),
        escape_html(solo_contact),
    )
}

/// To the owner when the solo declines.
pub fn invite_denied(solo_name: &str) -> String {
    format!("{} declined your invite.", escape_html(solo_name))
}

/// To the solo after they decided an invite.
pub fn invite_decided(accepted: bool, team_name: &str) -> String {
    if accepted {
        format!(
            "You accepted the invite from \u{ab}{}\u{bb}. They will contact you.",
            escape_html(team_name)
        )
    } else {
        "You declined the invite.".to_string()
    }
}

pub fn admin_stats(stats: &AdminStats) -> String {
    format!(
        "<b>Statistics</b>\n\n\
         Teams total: {}\n\
         Teams searching: {}\n\
         Solo profiles total: {}\n\
         Active profiles: {}\n\
         Pending requests: {}\n\
         Pending invites: {}",
        stats.total_teams,
        stats.active_teams,
        stats.total_users,
        stats.active_users,
        stats.pending_requests,
        stats.pending_invites,
    )
}

/// User-facing text for an entity error. System errors get a generic apology.
pub fn error_text(err: &AppError) -> String {
    match err {
        AppError::NotFound(_) => "Not found. It may have been deleted.".to_string(),
        AppError::Duplicate(msg) => format!("Already sent: {msg}."),
        AppError::Forbidden(msg) => format!("Not allowed: {msg}."),
        AppError::AlreadyProcessed(_) => "Already processed.".to_string(),
        AppError::Validation(msg) => format!("Please check your input: {msg}."),
        _ => "Something went wrong. Please try again later.".to_string(),
    }
}
