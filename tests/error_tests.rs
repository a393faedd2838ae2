// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::StatusCode, response::IntoResponse};
use jam_matchmaker::bot::texts;
use jam_matchmaker::error::AppError;
use jam_matchmaker::models::{DecisionEvent, DecisionStateMachine, DecisionStatus};

#[test]
fn test_entity_errors_classified() {
    assert!(AppError::NotFound("team".to_string()).is_entity_error());
    assert!(AppError::Duplicate("request".to_string()).is_entity_error());
    assert!(AppError::Forbidden("not yours".to_string()).is_entity_error());
    assert!(AppError::AlreadyProcessed("accepted".to_string()).is_entity_error());
    assert!(AppError::Validation("too short".to_string()).is_entity_error());
}

#[test]
fn test_system_errors_classified() {
    assert!(!AppError::Telegram("timeout".to_string()).is_entity_error());
    assert!(!AppError::Internal(anyhow::anyhow!("boom")).is_entity_error());
    assert!(!AppError::Unauthorized.is_entity_error());
}

#[test]
fn test_status_mapping() {
    let cases = [
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (AppError::Duplicate("x".into()), StatusCode::CONFLICT),
        (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
        (AppError::AlreadyProcessed("x".into()), StatusCode::CONFLICT),
        (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::Telegram("x".into()), StatusCode::BAD_GATEWAY),
        (
            AppError::Internal(anyhow::anyhow!("x")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}

#[test]
fn test_terminal_transition_becomes_already_processed() {
    let err: AppError = DecisionStateMachine::transition(DecisionStatus::Denied, DecisionEvent::Accept)
        .unwrap_err()
        .into();
    assert!(matches!(err, AppError::AlreadyProcessed(_)));
    assert_eq!(texts::error_text(&err), "Already processed.");
}

#[test]
fn test_system_error_text_is_generic() {
    let err = AppError::Internal(anyhow::anyhow!("disk full at /var/data"));
    let text = texts::error_text(&err);
    assert!(!text.contains("/var/data"));
}
