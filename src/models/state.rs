// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Decision state machine shared by join requests and invites.
//!
//! ```text
//! pending --accept--> accepted   (terminal)
//! pending --deny----> denied     (terminal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("Terminal state: {0} cannot transition")]
    TerminalState(DecisionStatus),
}

/// Status of a request or invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Pending,
    Accepted,
    Denied,
}

impl DecisionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Denied)
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Decision taken by the addressee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionEvent {
    Accept,
    Deny,
}

impl fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

pub struct DecisionStateMachine;

impl DecisionStateMachine {
    pub fn transition(
        current: DecisionStatus,
        event: DecisionEvent,
    ) -> Result<DecisionStatus, StateError> {
        match (current, event) {
            (DecisionStatus::Pending, DecisionEvent::Accept) => Ok(DecisionStatus::Accepted),
            (DecisionStatus::Pending, DecisionEvent::Deny) => Ok(DecisionStatus::Denied),
            (terminal, _) => Err(StateError::TerminalState(terminal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_accepted() {
        assert_eq!(
            DecisionStateMachine::transition(DecisionStatus::Pending, DecisionEvent::Accept),
            Ok(DecisionStatus::Accepted)
        );
    }

    #[test]
    fn test_pending_to_denied() {
        assert_eq!(
            DecisionStateMachine::transition(DecisionStatus::Pending, DecisionEvent::Deny),
            Ok(DecisionStatus::Denied)
        );
    }

    #[test]
    fn test_terminal_states_reject_every_event() {
        for terminal in [DecisionStatus::Accepted, DecisionStatus::Denied] {
            for event in [DecisionEvent::Accept, DecisionEvent::Deny] {
                assert_eq!(
                    DecisionStateMachine::transition(terminal, event),
                    Err(StateError::TerminalState(terminal))
                );
            }
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&DecisionStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: DecisionStatus = serde_json::from_str("\"denied\"").unwrap();
        assert_eq!(parsed, DecisionStatus::Denied);
    }
}
