// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules.

pub mod telegram_auth;

pub use telegram_auth::require_telegram_secret;
