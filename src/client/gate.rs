// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Route guard for the portal.
//!
//! Each time the location changes the gate re-validates the stored token
//! with the `auth` endpoint. A valid session is renewed in storage; any
//! failure clears storage and redirects to the login page, remembering
//! where the visitor was headed.

use serde_json::Value;

use super::gateway::{bearer, ApiGateway, RequestBody};
use super::storage::{CredentialStore, TOKEN_STORAGE_KEY};

/// Path of the portal login page.
pub const LOGIN_PATH: &str = "/portal/login";

/// Endpoint validating a session.
const AUTH_API: &str = "auth";

/// A navigation target. Two visits to the same path differ by `key`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub pathname: String,
    pub search: String,
    pub key: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Where the visitor was going when the check failed.
    pub from: Location,
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Authenticated,
    Unauthenticated { redirect: Redirect },
}

pub struct AuthGate<S> {
    gateway: ApiGateway,
    store: S,
    state: GateState,
    checked: Option<Location>,
}

impl<S: CredentialStore> AuthGate<S> {
    pub fn new(gateway: ApiGateway, store: S) -> Self {
        Self {
            gateway,
            store,
            state: GateState::Checking,
            checked: None,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report the current location.
    ///
    /// A location equal to the last one observed keeps the current verdict;
    /// any other location triggers a fresh check.
    pub async fn observe(&mut self, location: &Location) -> &GateState {
        if self.checked.as_ref() == Some(location) {
            return &self.state;
        }

        self.checked = Some(location.clone());
        self.state = GateState::Checking;
        self.state = self.check(location).await;
        &self.state
    }

    async fn check(&self, location: &Location) -> GateState {
        let token = match self.store.get(TOKEN_STORAGE_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return self.deny(location),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read stored credential");
                return self.deny(location);
            }
        };

        let headers = match bearer(&token) {
            Ok(headers) => headers,
            Err(err) => {
                tracing::debug!(error = %err, "Stored credential is not a valid header value");
                return self.deny(location);
            }
        };

        let envelope = match self.gateway.call(AUTH_API, RequestBody::empty(), headers).await {
            Ok(envelope) if envelope.is_success() => envelope,
            Ok(envelope) => {
                tracing::debug!(error = envelope.error().unwrap_or_default(), "Session rejected");
                return self.deny(location);
            }
            Err(err) => {
                tracing::debug!(error = %err.message(), "Session check failed");
                return self.deny(location);
            }
        };

        let renewed = envelope
            .payload()
            .and_then(|payload| payload.get(TOKEN_STORAGE_KEY))
            .and_then(Value::as_str);
        if let Some(renewed) = renewed {
            if let Err(err) = self.store.set(TOKEN_STORAGE_KEY, renewed) {
                tracing::warn!(error = %err, "Failed to store renewed credential");
            }
        }
        GateState::Authenticated
    }

    fn deny(&self, location: &Location) -> GateState {
        if let Err(err) = self.store.remove(TOKEN_STORAGE_KEY) {
            tracing::warn!(error = %err, "Failed to clear stored credential");
        }
        GateState::Unauthenticated {
            redirect: Redirect {
                to: LOGIN_PATH.to_string(),
                from: location.clone(),
                replace: true,
            },
        }
    }
}
