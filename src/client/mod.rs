// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! # Portal Client
//!
//! What the portal front end needs to talk to the chapter API:
//!
//! - [`ApiGateway`] posts to an endpoint and decodes the envelope.
//! - [`CredentialStore`] keeps the session token between visits.
//! - [`AuthGate`] re-validates the session on every navigation.
//! - [`PortalLogin`] validates the login form and stores the issued token.

pub mod gate;
pub mod gateway;
pub mod login;
pub mod storage;

pub use gate::{AuthGate, GateState, Location, Redirect, LOGIN_PATH};
pub use gateway::{bearer, ApiGateway, GatewayError, RequestBody};
pub use login::{LoginOutcome, PortalLogin, PORTAL_HOME};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore, TOKEN_STORAGE_KEY};
