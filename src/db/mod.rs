// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (JSON documents on local disk).

pub mod repository;
pub mod store;

pub use repository::Repository;
pub use store::{Collection, JsonStore, StoreError, SCHEMA_VERSION};
