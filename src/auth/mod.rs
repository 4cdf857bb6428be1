// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! # Authentication Module
//!
//! Session tokens for the members portal.
//!
//! ## Auth Flow
//!
//! 1. Portal posts email and password to `/login`
//! 2. Server verifies the argon2 hash and issues an HS256 token carrying
//!    `memberId`, `iat` and `exp`
//! 3. Portal stores the token and sends `Authorization: Bearer <token>`
//! 4. Server:
//!    - verifies signature and expiry (no leeway)
//!    - requires `memberId` to be a well-formed member id
//!    - hands the id to the handler
//!
//! Tokens are never stored server-side. Any failure along the way is
//! treated as "not logged in".

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedMember, SessionClaims};
pub use error::AuthError;
pub use extractor::{authenticate, extract_member, Auth};
pub use token::{IssuedToken, TokenCodec};
