// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team profile model.

use super::user::contact_for;
use super::{
    empty_string_as_none, normalize_optional, ParseEnumError, ParticipationFormat, UserId,
    MIN_NAME_CHARS,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Role a team is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Designer,
    Programmer,
    Music,
    #[serde(other)]
    Other,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Designer, Role::Programmer, Role::Music, Role::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Designer => "designer",
            Self::Programmer => "programmer",
            Self::Music => "music",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Designer => "Designer",
            Self::Programmer => "Programmer",
            Self::Music => "Music",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("role", s))
    }
}

/// Team stored in the `teams` collection (keyed by `owner_{owner_id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub owner_id: UserId,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub owner_username: Option<String>,
    /// Assigned once on first creation, never reused
    pub team_number: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub team_name: Option<String>,
    pub description: String,
    pub roles_needed: Vec<Role>,
    #[serde(default)]
    pub pitch_format: ParticipationFormat,
    /// Hidden from browse listings while paused
    #[serde(default)]
    pub is_paused: bool,
    /// Reserved; always empty today
    #[serde(default)]
    pub members: Vec<UserId>,
    pub created_at: String,
}

impl Team {
    /// Storage key in the `teams` collection.
    pub fn storage_key(owner_id: UserId) -> String {
        format!("owner_{owner_id}")
    }

    /// Team name, falling back to `Team #N`.
    pub fn display_name(&self) -> String {
        match &self.team_name {
            Some(name) => name.clone(),
            None => format!("Team #{}", self.team_number),
        }
    }

    /// Active = visible in browse listings.
    pub fn is_active(&self) -> bool {
        !self.is_paused
    }

    pub fn owner_contact(&self) -> String {
        contact_for(self.owner_id, self.owner_username.as_deref())
    }
}

fn validate_team_name(name: &str) -> Result<(), validator::ValidationError> {
    let len = name.chars().count();
    if len < MIN_NAME_CHARS {
        return Err(validator::ValidationError::new("team_name_length")
            .with_message("team name must be at least 2 characters".into()));
    }
    Ok(())
}

/// A completed team form, validated before it reaches the repository.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct TeamProfile {
    pub owner_id: UserId,
    pub owner_username: Option<String>,
    /// `None` means "no name" (shown as `Team #N`)
    #[validate(custom(function = "validate_team_name"))]
    pub team_name: Option<String>,
    pub pitch_format: ParticipationFormat,
    #[validate(length(min = 10, message = "description must be at least 10 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "select at least one role"))]
    pub roles: Vec<Role>,
}

impl TeamProfile {
    /// Trim free text and drop duplicate roles (first occurrence wins).
    pub fn normalized(self) -> Self {
        let mut roles: Vec<Role> = Vec::with_capacity(self.roles.len());
        for role in self.roles {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        Self {
            owner_username: normalize_optional(self.owner_username),
            team_name: normalize_optional(self.team_name),
            description: self.description.trim().to_string(),
            roles,
            ..self
        }
    }
}
