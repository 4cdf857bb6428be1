// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Theta Omicron Portal - Chapter API and portal client
//!
//! This crate serves the chapter roster (members, chairs, committees) and the
//! site's editable pages over a POST-only JSON API, and provides the
//! client-side pieces the portal uses to talk to it.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session tokens, password hashing and the bearer extractor
//! - `client` - API gateway, credential storage, auth gate and portal login
//! - `envelope` - The `{success, ...}` response shape shared by both sides
//! - `storage` - Roster database (redb) and page documents

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
