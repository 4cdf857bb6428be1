// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Portal login form.

use reqwest::header::HeaderMap;
use serde_json::{json, Value};

use super::gate::Location;
use super::gateway::{ApiGateway, RequestBody};
use super::storage::{CredentialStore, TOKEN_STORAGE_KEY};
use crate::validation::{is_valid_email, INVALID_EMAIL_MESSAGE, MISSING_CREDENTIALS_MESSAGE};

/// Where a login lands when the visitor did not come from a portal page.
pub const PORTAL_HOME: &str = "/portal";

const LOGIN_API: &str = "login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Stay on the form; `error_message` says why.
    Rejected,
    Navigate { to: String, replace: bool },
}

/// Form state. The password is cleared after every failed attempt.
#[derive(Debug, Clone, Default)]
pub struct PortalLogin {
    pub email: String,
    pub password: String,
    pub error_message: String,
}

impl PortalLogin {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error_message: String::new(),
        }
    }

    /// Submit the form.
    ///
    /// `from` is the location the auth gate redirected away from, if any.
    pub async fn submit<S: CredentialStore>(
        &mut self,
        gateway: &ApiGateway,
        store: &S,
        from: Option<&Location>,
    ) -> LoginOutcome {
        if self.email.is_empty() || self.password.is_empty() {
            return self.reject(MISSING_CREDENTIALS_MESSAGE);
        }
        if !is_valid_email(&self.email) {
            return self.reject(INVALID_EMAIL_MESSAGE);
        }

        let body = json!({ "email": self.email, "password": self.password });
        let envelope = match gateway.call(LOGIN_API, RequestBody::Json(body), HeaderMap::new()).await {
            Ok(envelope) => envelope,
            Err(err) => return self.reject(&err.message()),
        };
        if let Some(message) = envelope.error() {
            return self.reject(message);
        }

        let token = envelope
            .payload()
            .and_then(|payload| payload.get(TOKEN_STORAGE_KEY))
            .and_then(Value::as_str);
        let Some(token) = token else {
            return self.reject("Login response did not include a session.");
        };
        if let Err(err) = store.set(TOKEN_STORAGE_KEY, token) {
            tracing::warn!(error = %err, "Failed to store session token");
            return self.reject("Could not save your session. Please try again.");
        }

        self.error_message.clear();
        LoginOutcome::Navigate {
            to: from.map_or(PORTAL_HOME, |location| location.pathname.as_str()).to_string(),
            replace: true,
        }
    }

    fn reject(&mut self, message: &str) -> LoginOutcome {
        self.error_message = message.to_string();
        self.password.clear();
        LoginOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryCredentialStore;
    use crate::models::MemberStatus;
    use crate::test_support::{add_member, spawn_server, test_state};

    async fn server() -> (ApiGateway, crate::state::AppState, tempfile::TempDir) {
        let (state, dir) = test_state();
        add_member(&state, "Sam", "Rivera", "sam@example.edu", "hunter22", MemberStatus::Initiate);
        let addr = spawn_server(state.clone()).await;
        (ApiGateway::new(&format!("http://{addr}")).unwrap(), state, dir)
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_locally() {
        // Nothing listens here; a request would fail with a network error.
        let gateway = ApiGateway::new("http://127.0.0.1:9").unwrap();
        let store = MemoryCredentialStore::new();

        let mut form = PortalLogin::new("", "secret");
        assert_eq!(form.submit(&gateway, &store, None).await, LoginOutcome::Rejected);
        assert_eq!(form.error_message, MISSING_CREDENTIALS_MESSAGE);
        assert!(form.password.is_empty());

        let mut form = PortalLogin::new("sam.example.edu", "secret");
        assert_eq!(form.submit(&gateway, &store, None).await, LoginOutcome::Rejected);
        assert_eq!(form.error_message, INVALID_EMAIL_MESSAGE);
        assert!(form.password.is_empty());
    }

    #[tokio::test]
    async fn wrong_password_shows_server_message() {
        let (gateway, _state, _dir) = server().await;
        let store = MemoryCredentialStore::new();

        let mut form = PortalLogin::new("sam@example.edu", "wrong");
        let outcome = form.submit(&gateway, &store, None).await;

        assert_eq!(outcome, LoginOutcome::Rejected);
        assert_eq!(form.error_message, "Invalid email or password.");
        assert!(form.password.is_empty());
        assert_eq!(form.email, "sam@example.edu");
        assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn success_stores_token_and_returns_to_origin() {
        let (gateway, state, _dir) = server().await;
        let store = MemoryCredentialStore::new();
        let origin = Location::new("/portal/roster");

        let mut form = PortalLogin::new("sam@example.edu", "hunter22");
        let outcome = form.submit(&gateway, &store, Some(&origin)).await;

        assert_eq!(
            outcome,
            LoginOutcome::Navigate {
                to: "/portal/roster".to_string(),
                replace: true
            }
        );
        let token = store.get(TOKEN_STORAGE_KEY).unwrap().expect("token stored");
        assert!(state.tokens.verify(&token).is_ok());
        assert!(form.error_message.is_empty());
    }

    #[tokio::test]
    async fn success_without_origin_goes_to_portal_home() {
        let (gateway, _state, _dir) = server().await;
        let store = MemoryCredentialStore::new();

        let mut form = PortalLogin::new("sam@example.edu", "hunter22");
        let outcome = form.submit(&gateway, &store, None).await;
        assert_eq!(
            outcome,
            LoginOutcome::Navigate {
                to: PORTAL_HOME.to_string(),
                replace: true
            }
        );
    }
}
