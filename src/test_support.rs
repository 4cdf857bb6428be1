// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Fixtures shared by unit tests.

use std::net::SocketAddr;
use std::path::Path;

use chrono::Utc;
use tempfile::TempDir;

use crate::api::router;
use crate::auth::password;
use crate::config::{Config, LogFormat};
use crate::models::{MemberId, MemberStatus};
use crate::state::AppState;
use crate::storage::StoredMember;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-123";

pub fn test_config(data_dir: &Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: data_dir.to_path_buf(),
        session_secret: TEST_SECRET.to_string(),
        session_ttl_secs: 3600,
        log_format: LogFormat::Pretty,
        tls: None,
        seed_admin: None,
    }
}

/// State backed by a fresh temp directory. Keep the directory alive for
/// the duration of the test.
pub fn test_state() -> (AppState, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let state = AppState::open(&test_config(dir.path())).expect("Failed to open test state");
    (state, dir)
}

/// Insert a member with a real password hash.
pub fn add_member(
    state: &AppState,
    first: &str,
    last: &str,
    email: &str,
    password: &str,
    status: MemberStatus,
) -> MemberId {
    let member = StoredMember {
        member_id: MemberId::generate(),
        email: email.to_lowercase(),
        school_email: None,
        password_hash: password::hash_password(password).expect("hash"),
        first_name: first.to_string(),
        last_name: last.to_string(),
        status,
        phone: None,
        street: None,
        city: None,
        state: None,
        postal_code: None,
        initiation_year: Some(2022),
        graduation_year: Some(2026),
        created_at: Utc::now(),
    };
    state.db.add_member(&member).expect("add member");
    member.member_id
}

/// Serve the full router on an ephemeral local port.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind a local port");
    let addr = listener.local_addr().expect("Failed to read local port");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(state)).await;
    });
    addr
}
