// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Repository identity and uniqueness tests against a real data directory.

use jam_matchmaker::db::{Collection, JsonStore, Repository};
use jam_matchmaker::error::AppError;
use jam_matchmaker::models::{DecisionEvent, DecisionStatus, Specialty};
use std::fs;

mod common;
use common::{solo_profile, team_profile, test_repo};

#[tokio::test]
async fn test_resubmitting_profile_keeps_one_record() {
    let (repo, _dir) = test_repo();

    let first = repo
        .save_user(&solo_profile(10, "Alice", Specialty::Programmer))
        .await
        .unwrap();
    repo.set_user_active(10, false).await.unwrap();

    let second = repo
        .save_user(&solo_profile(10, "Alice B", Specialty::Artist))
        .await
        .unwrap();

    assert_eq!(repo.get_users().await.unwrap().len(), 1);
    assert_eq!(second.display_name, "Alice B");
    assert_eq!(second.specialty, Specialty::Artist);
    assert_eq!(second.created_at, first.created_at);
    // Visibility survives resubmission
    assert!(!second.is_active);
}

#[tokio::test]
async fn test_team_numbers_assigned_once() {
    let (repo, _dir) = test_repo();

    let a = repo.save_team(&team_profile(100, Some("Alpha"))).await.unwrap();
    let b = repo.save_team(&team_profile(200, None)).await.unwrap();
    assert_eq!(a.team_number, 1);
    assert_eq!(b.team_number, 2);
    assert_eq!(b.display_name(), "Team #2");

    // Editing keeps the number and the pause flag
    repo.toggle_team_pause(100).await.unwrap();
    let edited = repo.save_team(&team_profile(100, Some("Alpha 2"))).await.unwrap();
    assert_eq!(edited.team_number, 1);
    assert!(edited.is_paused);
    assert_eq!(edited.created_at, a.created_at);
    assert_eq!(repo.get_teams().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_team_number_not_reused_after_delete() {
    let (repo, _dir) = test_repo();

    repo.save_team(&team_profile(100, None)).await.unwrap();
    let second = repo.save_team(&team_profile(200, None)).await.unwrap();
    assert_eq!(second.team_number, 2);

    assert!(repo.delete_team(200).await.unwrap());
    assert!(!repo.delete_team(200).await.unwrap());

    let third = repo.save_team(&team_profile(300, None)).await.unwrap();
    assert_eq!(third.team_number, 3);

    // Recreating a deleted team is a new team with a new number
    let again = repo.save_team(&team_profile(200, None)).await.unwrap();
    assert_eq!(again.team_number, 4);
}

#[tokio::test]
async fn test_active_teams_sorted_and_paused_hidden() {
    let (repo, _dir) = test_repo();

    for owner in [300, 100, 200] {
        repo.save_team(&team_profile(owner, None)).await.unwrap();
    }
    assert_eq!(repo.toggle_team_pause(100).await.unwrap(), Some(true));
    assert_eq!(repo.toggle_team_pause(999).await.unwrap(), None);

    let active = repo.get_active_teams().await.unwrap();
    let numbers: Vec<u32> = active.iter().map(|t| t.team_number).collect();
    assert_eq!(numbers, vec![1, 3]);
}

#[tokio::test]
async fn test_active_users_filtered_by_specialty() {
    let (repo, _dir) = test_repo();

    repo.save_user(&solo_profile(1, "Ann", Specialty::Programmer))
        .await
        .unwrap();
    repo.save_user(&solo_profile(2, "Bob", Specialty::Artist))
        .await
        .unwrap();
    repo.save_user(&solo_profile(3, "Cid", Specialty::Programmer))
        .await
        .unwrap();
    repo.set_user_active(3, false).await.unwrap();

    let all = repo.get_active_users_by_specialty(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let programmers = repo
        .get_active_users_by_specialty(Some(Specialty::Programmer))
        .await
        .unwrap();
    assert_eq!(programmers.len(), 1);
    assert_eq!(programmers[0].user_id, 1);

    assert!(!repo.set_user_active(42, true).await.unwrap());
}

#[tokio::test]
async fn test_one_pending_request_per_pair() {
    let (repo, _dir) = test_repo();

    let first = repo.create_request(10, 20).await.unwrap().unwrap();
    assert_eq!(first.status, DecisionStatus::Pending);
    assert!(first.request_id.starts_with("10_20_"));
    assert!(repo.create_request(10, 20).await.unwrap().is_none());

    // A different pair is unaffected
    assert!(repo.create_request(11, 20).await.unwrap().is_some());

    // After a decision the pair may apply again
    repo.transition_request(&first.request_id, DecisionEvent::Deny)
        .await
        .unwrap();
    let second = repo.create_request(10, 20).await.unwrap().unwrap();
    assert_ne!(second.request_id, first.request_id);

    let latest = repo
        .get_request_by_solo_and_team(10, 20)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.request_id, second.request_id);
    assert_eq!(repo.get_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_transition_rejects_terminal_and_unknown() {
    let (repo, _dir) = test_repo();

    let request = repo.create_request(10, 20).await.unwrap().unwrap();
    let accepted = repo
        .transition_request(&request.request_id, DecisionEvent::Accept)
        .await
        .unwrap();
    assert_eq!(accepted.status, DecisionStatus::Accepted);

    let err = repo
        .transition_request(&request.request_id, DecisionEvent::Deny)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyProcessed(_)));

    let err = repo
        .transition_request("nope", DecisionEvent::Accept)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let stored = repo.get_request(&request.request_id).await.unwrap().unwrap();
    assert_eq!(stored.status, DecisionStatus::Accepted);
}

#[tokio::test]
async fn test_status_setters_are_unconditional() {
    let (repo, _dir) = test_repo();

    let request = repo.create_request(10, 20).await.unwrap().unwrap();
    assert!(repo
        .update_request_status(&request.request_id, DecisionStatus::Accepted)
        .await
        .unwrap());
    // No transition rule at this level
    assert!(repo
        .update_request_status(&request.request_id, DecisionStatus::Pending)
        .await
        .unwrap());
    assert!(!repo
        .update_request_status("unknown", DecisionStatus::Denied)
        .await
        .unwrap());

    let invite = repo.create_invite(20, 10).await.unwrap().unwrap();
    assert!(repo
        .update_invite_status(&invite.invite_id, DecisionStatus::Denied)
        .await
        .unwrap());
    let stored = repo.get_invite(&invite.invite_id).await.unwrap().unwrap();
    assert_eq!(stored.status, DecisionStatus::Denied);
}

#[tokio::test]
async fn test_invites_pending_for_solo_oldest_first() {
    let (repo, _dir) = test_repo();

    let first = repo.create_invite(100, 7).await.unwrap().unwrap();
    let second = repo.create_invite(200, 7).await.unwrap().unwrap();
    assert!(first.invite_id.starts_with("inv_100_7_"));
    assert!(repo.create_invite(100, 7).await.unwrap().is_none());

    let pending = repo.get_pending_invites_for_solo(7).await.unwrap();
    let ids: Vec<&str> = pending.iter().map(|i| i.invite_id.as_str()).collect();
    assert_eq!(ids, vec![first.invite_id.as_str(), second.invite_id.as_str()]);

    repo.transition_invite(&first.invite_id, DecisionEvent::Accept)
        .await
        .unwrap();
    assert_eq!(repo.get_pending_invites_for_solo(7).await.unwrap().len(), 1);
    assert_eq!(
        repo.get_invite_by_team_and_solo(100, 7)
            .await
            .unwrap()
            .unwrap()
            .status,
        DecisionStatus::Accepted
    );
}

#[tokio::test]
async fn test_delete_team_keeps_requests_and_invites() {
    let (repo, _dir) = test_repo();

    repo.save_team(&team_profile(100, None)).await.unwrap();
    let request = repo.create_request(5, 100).await.unwrap().unwrap();
    let invite = repo.create_invite(100, 5).await.unwrap().unwrap();

    repo.delete_team(100).await.unwrap();

    assert!(repo.get_request(&request.request_id).await.unwrap().is_some());
    assert!(repo.get_invite(&invite.invite_id).await.unwrap().is_some());
    assert_eq!(repo.get_pending_requests_for_team(100).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_stats_counts() {
    let (repo, _dir) = test_repo();

    repo.save_team(&team_profile(100, None)).await.unwrap();
    repo.save_team(&team_profile(200, None)).await.unwrap();
    repo.toggle_team_pause(200).await.unwrap();
    repo.save_user(&solo_profile(1, "Ann", Specialty::Artist))
        .await
        .unwrap();
    let request = repo.create_request(1, 100).await.unwrap().unwrap();
    repo.create_request(1, 200).await.unwrap();
    repo.transition_request(&request.request_id, DecisionEvent::Accept)
        .await
        .unwrap();
    repo.create_invite(100, 1).await.unwrap();

    let stats = repo.admin_stats().await.unwrap();
    assert_eq!(stats.total_teams, 2);
    assert_eq!(stats.active_teams, 1);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.active_users, 1);
    assert_eq!(stats.pending_requests, 1);
    assert_eq!(stats.pending_invites, 1);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let (repo, dir) = test_repo();
    repo.save_team(&team_profile(100, Some("Alpha"))).await.unwrap();
    repo.create_request(5, 100).await.unwrap();
    drop(repo);

    let reopened = Repository::new(JsonStore::open(dir.path()).unwrap());
    let team = reopened.get_team(100).await.unwrap().unwrap();
    assert_eq!(team.team_name.as_deref(), Some("Alpha"));
    assert_eq!(reopened.get_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_legacy_team_document_is_read() {
    let (repo, _dir) = test_repo();
    // Unversioned mapping with an empty-string name and no optional fields
    fs::write(
        repo.store().path(Collection::Teams),
        r#"{
            "owner_100": {
                "owner_id": 100,
                "owner_username": "",
                "team_number": 7,
                "team_name": "",
                "description": "Old team from before versioning",
                "roles_needed": ["programmer"],
                "created_at": "2024-05-01T10:00:00.000000Z"
            }
        }"#,
    )
    .unwrap();

    let team = repo.get_team(100).await.unwrap().unwrap();
    assert_eq!(team.team_number, 7);
    assert_eq!(team.team_name, None);
    assert_eq!(team.owner_username, None);
    assert!(!team.is_paused);

    // New teams continue after the legacy number
    let next = repo.save_team(&team_profile(200, None)).await.unwrap();
    assert_eq!(next.team_number, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_not_lost() {
    let (repo, _dir) = test_repo();
    const N: i64 = 20;

    let mut handles = Vec::new();
    for i in 0..N {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.save_team(&team_profile(1000 + i, None))
                .await
                .expect("Team write failed");
            repo.create_request(i, 1000 + i).await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Write failed");
    }

    let teams = repo.get_teams().await.unwrap();
    assert_eq!(teams.len(), N as usize);
    let mut numbers: Vec<u32> = teams.values().map(|t| t.team_number).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=N as u32).collect::<Vec<_>>());
    assert_eq!(repo.get_requests().await.unwrap().len(), N as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_requests_create_one() {
    let (repo, _dir) = test_repo();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repo = repo.clone();
        handles.push(tokio::spawn(
            async move { repo.create_request(5, 100).await },
        ));
    }
    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(repo.get_pending_requests_for_team(100).await.unwrap().len(), 1);
}
