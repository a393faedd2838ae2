// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Solo participant profile model.

use super::{default_true, empty_string_as_none, normalize_optional, ParseEnumError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Age category declared in the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    #[serde(rename = "18-")]
    Under18,
    #[serde(rename = "18+")]
    Adult,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 2] = [AgeCategory::Under18, AgeCategory::Adult];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under18 => "18-",
            Self::Adult => "18+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under18 => "Under 18",
            Self::Adult => "18+",
        }
    }
}

impl FromStr for AgeCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "18-" | "under18" => Ok(Self::Under18),
            "18+" => Ok(Self::Adult),
            other => Err(ParseEnumError::new("age category", other)),
        }
    }
}

/// Online or in-person. Used both for solo participation and team pitching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationFormat {
    #[default]
    Online,
    Offline,
}

impl ParticipationFormat {
    pub const ALL: [ParticipationFormat; 2] =
        [ParticipationFormat::Online, ParticipationFormat::Offline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

impl FromStr for ParticipationFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(ParseEnumError::new("format", other)),
        }
    }
}

/// Declared skill category of a participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    GameDesign,
    Designer,
    Programmer,
    Artist,
    Sound,
    Producer,
    #[default]
    #[serde(other)]
    Other,
}

impl Specialty {
    pub const ALL: [Specialty; 7] = [
        Specialty::GameDesign,
        Specialty::Designer,
        Specialty::Programmer,
        Specialty::Artist,
        Specialty::Sound,
        Specialty::Producer,
        Specialty::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameDesign => "gamedesign",
            Self::Designer => "designer",
            Self::Programmer => "programmer",
            Self::Artist => "artist",
            Self::Sound => "sound",
            Self::Producer => "producer",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GameDesign => "Game design",
            Self::Designer => "Designer",
            Self::Programmer => "Programmer",
            Self::Artist => "Artist",
            Self::Sound => "Sound/music",
            Self::Producer => "Producer",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Specialty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialty::ALL
            .into_iter()
            .find(|spec| spec.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("specialty", s))
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solo profile stored in the `users` collection (keyed by user id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    /// Telegram @handle, without the `@`
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub username: Option<String>,
    pub display_name: String,
    pub age_category: AgeCategory,
    #[serde(default)]
    pub participation_format: ParticipationFormat,
    #[serde(default)]
    pub specialty: Specialty,
    pub description: String,
    /// Visible in browse listings
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// When the profile was first submitted (RFC3339)
    pub created_at: String,
}

impl User {
    /// Storage key in the `users` collection.
    pub fn storage_key(user_id: UserId) -> String {
        user_id.to_string()
    }

    /// Name to show on cards: display name, else handle.
    pub fn shown_name(&self) -> &str {
        if !self.display_name.trim().is_empty() {
            &self.display_name
        } else {
            self.username.as_deref().unwrap_or("-")
        }
    }

    /// How a counterpart can reach this person.
    pub fn contact(&self) -> String {
        contact_for(self.user_id, self.username.as_deref())
    }
}

/// `@handle` when known, otherwise the numeric id.
pub fn contact_for(user_id: UserId, username: Option<&str>) -> String {
    match username.filter(|u| !u.is_empty()) {
        Some(handle) => format!("@{handle}"),
        None => format!("ID: {user_id}"),
    }
}

/// A completed solo profile form, validated before it reaches the repository.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SoloProfile {
    pub user_id: UserId,
    pub username: Option<String>,
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub display_name: String,
    pub age_category: AgeCategory,
    pub participation_format: ParticipationFormat,
    pub specialty: Specialty,
    #[validate(length(min = 10, message = "description must be at least 10 characters"))]
    pub description: String,
}

impl SoloProfile {
    /// Trim free-text fields; call before `validate()`.
    pub fn normalized(self) -> Self {
        Self {
            username: normalize_optional(self.username),
            display_name: self.display_name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}
