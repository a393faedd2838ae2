// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-chat form state for the profile questionnaires.
//!
//! State lives only in memory. A restart drops half-filled forms, and the
//! user starts over with `/start`.

use crate::models::{
    AgeCategory, ParticipationFormat, Role, SoloProfile, Specialty, TeamProfile, UserId,
};
use dashmap::DashMap;
use std::sync::Arc;

/// Solo questionnaire: name, age, format, specialty, description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoloForm {
    DisplayName,
    AgeCategory {
        display_name: String,
    },
    Format {
        display_name: String,
        age_category: AgeCategory,
    },
    Specialty {
        display_name: String,
        age_category: AgeCategory,
        participation_format: ParticipationFormat,
    },
    Description {
        display_name: String,
        age_category: AgeCategory,
        participation_format: ParticipationFormat,
        specialty: Specialty,
    },
}

impl SoloForm {
    pub fn with_name(&self, display_name: &str) -> Option<Self> {
        match self {
            Self::DisplayName => Some(Self::AgeCategory {
                display_name: display_name.to_string(),
            }),
            _ => None,
        }
    }

    pub fn with_age(&self, age_category: AgeCategory) -> Option<Self> {
        match self {
            Self::AgeCategory { display_name } => Some(Self::Format {
                display_name: display_name.clone(),
                age_category,
            }),
            _ => None,
        }
    }

    pub fn with_format(&self, participation_format: ParticipationFormat) -> Option<Self> {
        match self {
            Self::Format {
                display_name,
                age_category,
            } => Some(Self::Specialty {
                display_name: display_name.clone(),
                age_category: *age_category,
                participation_format,
            }),
            _ => None,
        }
    }

    pub fn with_specialty(&self, specialty: Specialty) -> Option<Self> {
        match self {
            Self::Specialty {
                display_name,
                age_category,
                participation_format,
            } => Some(Self::Description {
                display_name: display_name.clone(),
                age_category: *age_category,
                participation_format: *participation_format,
                specialty,
            }),
            _ => None,
        }
    }

    /// Complete the form. Only valid on the last step.
    pub fn finish(
        &self,
        user_id: UserId,
        username: Option<String>,
        description: &str,
    ) -> Option<SoloProfile> {
        match self {
            Self::Description {
                display_name,
                age_category,
                participation_format,
                specialty,
            } => Some(SoloProfile {
                user_id,
                username,
                display_name: display_name.clone(),
                age_category: *age_category,
                participation_format: *participation_format,
                specialty: *specialty,
                description: description.to_string(),
            }),
            _ => None,
        }
    }
}

/// Team questionnaire: name (or skip), pitch format, description, roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamForm {
    Name,
    Pitch {
        team_name: Option<String>,
    },
    Description {
        team_name: Option<String>,
        pitch_format: ParticipationFormat,
    },
    Roles {
        team_name: Option<String>,
        pitch_format: ParticipationFormat,
        description: String,
        selected: Vec<Role>,
    },
}

impl TeamForm {
    /// `None` means the owner skipped naming the team.
    pub fn with_name(&self, team_name: Option<&str>) -> Option<Self> {
        match self {
            Self::Name => Some(Self::Pitch {
                team_name: team_name.map(str::to_string),
            }),
            _ => None,
        }
    }

    pub fn with_pitch(&self, pitch_format: ParticipationFormat) -> Option<Self> {
        match self {
            Self::Pitch { team_name } => Some(Self::Description {
                team_name: team_name.clone(),
                pitch_format,
            }),
            _ => None,
        }
    }

    pub fn with_description(&self, description: &str) -> Option<Self> {
        match self {
            Self::Description {
                team_name,
                pitch_format,
            } => Some(Self::Roles {
                team_name: team_name.clone(),
                pitch_format: *pitch_format,
                description: description.to_string(),
                selected: Vec::new(),
            }),
            _ => None,
        }
    }

    /// Select an unselected role, or unselect a selected one.
    pub fn toggle_role(&self, role: Role) -> Option<Self> {
        match self {
            Self::Roles {
                team_name,
                pitch_format,
                description,
                selected,
            } => {
                let mut selected = selected.clone();
                match selected.iter().position(|r| *r == role) {
                    Some(idx) => {
                        selected.remove(idx);
                    }
                    None => selected.push(role),
                }
                Some(Self::Roles {
                    team_name: team_name.clone(),
                    pitch_format: *pitch_format,
                    description: description.clone(),
                    selected,
                })
            }
            _ => None,
        }
    }

    pub fn selected_roles(&self) -> &[Role] {
        match self {
            Self::Roles { selected, .. } => selected,
            _ => &[],
        }
    }

    /// Complete the form. Only valid on the roles step; an empty selection
    /// is passed through and rejected by validation.
    pub fn finish(&self, owner_id: UserId, owner_username: Option<String>) -> Option<TeamProfile> {
        match self {
            Self::Roles {
                team_name,
                pitch_format,
                description,
                selected,
            } => Some(TeamProfile {
                owner_id,
                owner_username,
                team_name: team_name.clone(),
                pitch_format: *pitch_format,
                description: description.clone(),
                roles: selected.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialogue {
    Solo(SoloForm),
    Team(TeamForm),
}

/// In-memory dialogue state keyed by chat id.
#[derive(Clone, Default)]
pub struct DialogueStore {
    inner: Arc<DashMap<i64, Dialogue>>,
}

impl DialogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chat_id: i64) -> Option<Dialogue> {
        self.inner.get(&chat_id).map(|d| d.value().clone())
    }

    pub fn set(&self, chat_id: i64, dialogue: Dialogue) {
        self.inner.insert(chat_id, dialogue);
    }

    /// Returns `true` if a dialogue was in progress.
    pub fn clear(&self, chat_id: i64) -> bool {
        self.inner.remove(&chat_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solo_form_walks_every_step() {
        let form = SoloForm::DisplayName
            .with_name("Mira")
            .and_then(|f| f.with_age(AgeCategory::Adult))
            .and_then(|f| f.with_format(ParticipationFormat::Offline))
            .and_then(|f| f.with_specialty(Specialty::Sound))
            .unwrap();

        let profile = form
            .finish(5, Some("mira".to_string()), "Foley and chiptune")
            .unwrap();
        assert_eq!(profile.display_name, "Mira");
        assert_eq!(profile.participation_format, ParticipationFormat::Offline);
        assert_eq!(profile.specialty, Specialty::Sound);
    }

    #[test]
    fn test_out_of_order_input_is_rejected() {
        assert_eq!(SoloForm::DisplayName.with_age(AgeCategory::Adult), None);
        assert_eq!(SoloForm::DisplayName.finish(1, None, "text"), None);
        assert_eq!(TeamForm::Name.toggle_role(Role::Music), None);
        assert_eq!(TeamForm::Name.finish(1, None), None);
    }

    #[test]
    fn test_role_toggle_adds_then_removes() {
        let form = TeamForm::Name
            .with_name(None)
            .and_then(|f| f.with_pitch(ParticipationFormat::Online))
            .and_then(|f| f.with_description("Roguelike about bees"))
            .unwrap();

        let form = form.toggle_role(Role::Programmer).unwrap();
        let form = form.toggle_role(Role::Music).unwrap();
        assert_eq!(form.selected_roles(), &[Role::Programmer, Role::Music]);

        let form = form.toggle_role(Role::Programmer).unwrap();
        assert_eq!(form.selected_roles(), &[Role::Music]);

        let profile = form.finish(9, None).unwrap();
        assert_eq!(profile.team_name, None);
        assert_eq!(profile.roles, vec![Role::Music]);
    }

    #[test]
    fn test_store_set_get_clear() {
        let store = DialogueStore::new();
        assert!(store.get(1).is_none());

        store.set(1, Dialogue::Team(TeamForm::Name));
        assert_eq!(store.get(1), Some(Dialogue::Team(TeamForm::Name)));
        assert_eq!(store.len(), 1);

        assert!(store.clear(1));
        assert!(!store.clear(1));
        assert!(store.is_empty());
    }
}
