// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inline button payloads.
//!
//! The string forms are kept byte-compatible with buttons already sitting in
//! users' chats, so old messages keep working after a redeploy.

use crate::models::{AgeCategory, ParticipationFormat, Role, Specialty, UserId};
use std::fmt;

/// Telegram rejects `callback_data` longer than this many bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    Solo,
    Team,
}

/// Every button the bot renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Back to the mode menu
    Start,
    Mode(BotMode),

    // Solo form
    Age(AgeCategory),
    Format(ParticipationFormat),
    Specialty(Specialty),

    // Team form
    TeamNameSkip,
    Pitch(ParticipationFormat),
    Role(Role),
    RolesDone,

    // Solo menu
    /// Entry into team browsing from the solo menu
    SoloBrowse(i64),
    /// Prev/next on a team card
    Browse(i64),
    CloseProfile,
    OpenProfile,
    SoloInvites,
    Request(UserId),
    InviteAccept(String),
    InviteDeny(String),

    // Team dashboard
    TeamRequests,
    TeamSearchSolos,
    TeamTogglePause,
    TeamDeleteConfirm,
    TeamDeleteYes,
    TeamDeleteNo,
    /// `None` = all specialties
    SoloFilter(Option<Specialty>),
    SoloBrowseFiltered(Option<Specialty>, i64),
    Invite(UserId),
    Accept(String),
    Deny(String),
}

fn filter_str(filter: Option<Specialty>) -> &'static str {
    filter.map_or("all", |s| s.as_str())
}

fn parse_filter(s: &str) -> Option<Option<Specialty>> {
    match s {
        "all" => Some(None),
        other => other.parse().ok().map(Some),
    }
}

impl CallbackAction {
    /// Parse button payload. Returns `None` for anything unrecognized.
    pub fn parse(data: &str) -> Option<Self> {
        use CallbackAction::*;

        let action = match data {
            "start" => Start,
            "mode:solo" => Mode(BotMode::Solo),
            "mode:team" => Mode(BotMode::Team),
            "team_name:skip" => TeamNameSkip,
            "roles:done" => RolesDone,
            "solo:close_profile" => CloseProfile,
            "solo:open_profile" => OpenProfile,
            "solo:invites" => SoloInvites,
            "team:requests" => TeamRequests,
            "team:search_solos" => TeamSearchSolos,
            "team:toggle_pause" => TeamTogglePause,
            "team:delete_confirm" => TeamDeleteConfirm,
            "team:delete_yes" => TeamDeleteYes,
            "team:delete_no" => TeamDeleteNo,
            _ => {
                let (prefix, rest) = data.split_once(':')?;
                match prefix {
                    "age" => Age(rest.parse().ok()?),
                    "format" => Format(rest.parse().ok()?),
                    "specialty" => Specialty(rest.parse().ok()?),
                    "pitch" => Pitch(rest.parse().ok()?),
                    "role" => Role(rest.parse().ok()?),
                    "solo" => SoloBrowse(rest.strip_prefix("browse:")?.parse().ok()?),
                    "browse" => Browse(rest.parse().ok()?),
                    "request" => Request(rest.parse().ok()?),
                    "invite" => Invite(rest.parse().ok()?),
                    "accept" => Accept(non_empty(rest)?),
                    "deny" => Deny(non_empty(rest)?),
                    "invite_accept" => InviteAccept(non_empty(rest)?),
                    "invite_deny" => InviteDeny(non_empty(rest)?),
                    "solofilter" => SoloFilter(parse_filter(rest)?),
                    "solobrowse" => {
                        let (filter, page) = rest.split_once(':')?;
                        SoloBrowseFiltered(parse_filter(filter)?, page.parse().ok()?)
                    }
                    _ => return None,
                }
            }
        };
        Some(action)
    }

    /// Payload string for a button.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CallbackAction::*;

        match self {
            Start => f.write_str("start"),
            Mode(BotMode::Solo) => f.write_str("mode:solo"),
            Mode(BotMode::Team) => f.write_str("mode:team"),
            Age(age) => write!(f, "age:{}", age.as_str()),
            Format(format) => write!(f, "format:{}", format.as_str()),
            Specialty(spec) => write!(f, "specialty:{}", spec.as_str()),
            TeamNameSkip => f.write_str("team_name:skip"),
            Pitch(format) => write!(f, "pitch:{}", format.as_str()),
            Role(role) => write!(f, "role:{}", role.as_str()),
            RolesDone => f.write_str("roles:done"),
            SoloBrowse(page) => write!(f, "solo:browse:{page}"),
            Browse(page) => write!(f, "browse:{page}"),
            CloseProfile => f.write_str("solo:close_profile"),
            OpenProfile => f.write_str("solo:open_profile"),
            SoloInvites => f.write_str("solo:invites"),
            Request(owner_id) => write!(f, "request:{owner_id}"),
            InviteAccept(id) => write!(f, "invite_accept:{id}"),
            InviteDeny(id) => write!(f, "invite_deny:{id}"),
            TeamRequests => f.write_str("team:requests"),
            TeamSearchSolos => f.write_str("team:search_solos"),
            TeamTogglePause => f.write_str("team:toggle_pause"),
            TeamDeleteConfirm => f.write_str("team:delete_confirm"),
            TeamDeleteYes => f.write_str("team:delete_yes"),
            TeamDeleteNo => f.write_str("team:delete_no"),
            SoloFilter(filter) => write!(f, "solofilter:{}", filter_str(*filter)),
            SoloBrowseFiltered(filter, page) => {
                write!(f, "solobrowse:{}:{page}", filter_str(*filter))
            }
            Invite(solo_id) => write!(f, "invite:{solo_id}"),
            Accept(id) => write!(f, "accept:{id}"),
            Deny(id) => write!(f, "deny:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_existing_button_payloads() {
        assert_eq!(CallbackAction::parse("start"), Some(CallbackAction::Start));
        assert_eq!(
            CallbackAction::parse("age:18-"),
            Some(CallbackAction::Age(AgeCategory::Under18))
        );
        assert_eq!(
            CallbackAction::parse("solo:browse:0"),
            Some(CallbackAction::SoloBrowse(0))
        );
        assert_eq!(
            CallbackAction::parse("browse:-1"),
            Some(CallbackAction::Browse(-1))
        );
        assert_eq!(
            CallbackAction::parse("accept:10_20_1700000000"),
            Some(CallbackAction::Accept("10_20_1700000000".to_string()))
        );
        assert_eq!(
            CallbackAction::parse("invite_deny:inv_20_10_1700000000_2"),
            Some(CallbackAction::InviteDeny(
                "inv_20_10_1700000000_2".to_string()
            ))
        );
        assert_eq!(
            CallbackAction::parse("solobrowse:all:3"),
            Some(CallbackAction::SoloBrowseFiltered(None, 3))
        );
        assert_eq!(
            CallbackAction::parse("solofilter:sound"),
            Some(CallbackAction::SoloFilter(Some(Specialty::Sound)))
        );
    }

    #[test]
    fn test_rejects_unknown_payloads() {
        for data in [
            "",
            "nope",
            "age:21",
            "browse:next",
            "request:abc",
            "accept:",
            "solobrowse:all",
            "solobrowse:wizard:1",
            "solo:unknown",
        ] {
            assert_eq!(CallbackAction::parse(data), None, "{data}");
        }
    }

    #[test]
    fn test_encode_parses_back() {
        let actions = [
            CallbackAction::Mode(BotMode::Team),
            CallbackAction::Pitch(ParticipationFormat::Offline),
            CallbackAction::Role(Role::Music),
            CallbackAction::SoloBrowseFiltered(Some(Specialty::GameDesign), 12),
            CallbackAction::Request(123456789),
            CallbackAction::TeamDeleteConfirm,
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn test_invite_ids_fit_telegram_limit() {
        // Ten-digit user ids, a collision suffix, and the longest prefix
        let invite_id = format!("inv_{}_{}_{}_{}", 9_999_999_999i64, 9_999_999_999i64, 1_700_000_000, 99);
        let data = CallbackAction::InviteAccept(invite_id).encode();
        assert!(
            data.len() <= MAX_CALLBACK_DATA_LEN,
            "{} bytes: {data}",
            data.len()
        );
    }
}
