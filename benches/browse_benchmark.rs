// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use criterion::{criterion_group, criterion_main, Criterion};
use jam_matchmaker::db::{Collection, JsonStore};
use jam_matchmaker::models::{AgeCategory, ParticipationFormat, Specialty, User};
use jam_matchmaker::services::paginate;
use std::collections::BTreeMap;
use std::hint::black_box;

const USERS: i64 = 5_000;

fn make_users() -> BTreeMap<String, User> {
    (0..USERS)
        .map(|id| {
            let user = User {
                user_id: id,
                username: Some(format!("user{id}")),
                display_name: format!("Participant {id}"),
                age_category: AgeCategory::Adult,
                participation_format: ParticipationFormat::Online,
                specialty: Specialty::ALL[id as usize % Specialty::ALL.len()],
                description: "Jam veteran with a portfolio of small games".to_string(),
                is_active: id % 5 != 0,
                created_at: format!("2025-01-01T00:00:{:02}.{:06}Z", id % 60, id),
            };
            (User::storage_key(id), user)
        })
        .collect()
}

fn filter_page(users: &BTreeMap<String, User>, specialty: Option<Specialty>, page: i64) -> usize {
    let mut active: Vec<&User> = users
        .values()
        .filter(|u| u.is_active && specialty.is_none_or(|s| u.specialty == s))
        .collect();
    active.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    paginate(active, page)
        .into_page()
        .map_or(0, |p| p.index)
}

fn benchmark_browse(c: &mut Criterion) {
    let users = make_users();

    let mut group = c.benchmark_group("browse_solos");

    group.bench_function("unfiltered_middle_page", |b| {
        b.iter(|| filter_page(black_box(&users), None, black_box(2_000)))
    });

    group.bench_function("specialty_filter_clamped_page", |b| {
        b.iter(|| filter_page(black_box(&users), Some(Specialty::Artist), black_box(i64::MAX)))
    });

    group.finish();
}

fn benchmark_store_read(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let store = JsonStore::open(dir.path()).expect("Failed to open store");
    store
        .write(Collection::Users, &make_users())
        .expect("Failed to write users");

    c.bench_function("read_users_document", |b| {
        b.iter(|| {
            let users: BTreeMap<String, User> =
                store.read(black_box(Collection::Users)).expect("read");
            users.len()
        })
    });
}

criterion_group!(benches, benchmark_browse, benchmark_store_read);
criterion_main!(benches);
