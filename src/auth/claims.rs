// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Session claims and the authenticated member they resolve to.

use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::models::MemberId;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Member the session belongs to. Checked for shape on decode.
    #[serde(rename = "memberId")]
    pub member_id: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Member identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedMember {
    pub member_id: MemberId,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl AuthenticatedMember {
    /// Build from verified claims.
    ///
    /// Fails unless the claimed identity is usable as a roster key.
    pub fn from_claims(claims: SessionClaims) -> Result<Self, AuthError> {
        let member_id = MemberId::parse(&claims.member_id).ok_or(AuthError::InvalidMemberId)?;
        Ok(Self {
            member_id,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(member_id: &str) -> SessionClaims {
        SessionClaims {
            member_id: member_id.to_string(),
            iat: 1_700_000_000,
            exp: 1_700_007_200,
        }
    }

    #[test]
    fn from_claims_extracts_member_id() {
        let member = AuthenticatedMember::from_claims(sample_claims("65F1C2A9E4B0A1D2C3F4A5B6")).unwrap();
        assert_eq!(member.member_id.as_str(), "65f1c2a9e4b0a1d2c3f4a5b6");
        assert_eq!(member.expires_at, 1_700_007_200);
    }

    #[test]
    fn from_claims_rejects_non_key_identity() {
        let result = AuthenticatedMember::from_claims(sample_claims("user_123"));
        assert!(matches!(result, Err(AuthError::InvalidMemberId)));
    }

    #[test]
    fn claims_use_member_id_field_name() {
        let value = serde_json::to_value(sample_claims("65f1c2a9e4b0a1d2c3f4a5b6")).unwrap();
        assert_eq!(value["memberId"], "65f1c2a9e4b0a1d2c3f4a5b6");
    }
}
