// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Session token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, AuthenticatedMember, SessionClaims};
use crate::models::MemberId;

/// A freshly signed token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with the server secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").field("ttl_secs", &self.ttl_secs).finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // An elapsed expiry is always rejected.
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Issue a token for `member_id` valid from now.
    pub fn issue(&self, member_id: &MemberId) -> Result<IssuedToken, AuthError> {
        self.issue_at(member_id, Utc::now())
    }

    /// Issue a token as if it were created at `issued_at`.
    pub fn issue_at(&self, member_id: &MemberId, issued_at: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                AuthError::InternalError(format!("session lifetime of {}s is out of range", self.ttl_secs))
            })?;
        let claims = SessionClaims {
            member_id: member_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("failed to sign session token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return the member it names.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedMember, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        AuthenticatedMember::from_claims(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-123";

    fn member() -> MemberId {
        MemberId::parse("65f1c2a9e4b0a1d2c3f4a5b6").unwrap()
    }

    #[test]
    fn issued_token_verifies_to_same_member() {
        let codec = TokenCodec::new(SECRET, 3600);
        let issued = codec.issue(&member()).unwrap();

        let verified = codec.verify(&issued.token).unwrap();
        assert_eq!(verified.member_id, member());
        assert_eq!(verified.expires_at, issued.expires_at.timestamp());
    }

    #[test]
    fn out_of_range_lifetime_fails_instead_of_panicking() {
        // Too large for a chrono duration at all.
        let codec = TokenCodec::new(SECRET, i64::MAX);
        assert!(matches!(codec.issue(&member()), Err(AuthError::InternalError(_))));

        // A valid duration that overflows once added to now.
        let codec = TokenCodec::new(SECRET, 10_000_000_000_000);
        assert!(matches!(codec.issue(&member()), Err(AuthError::InternalError(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new(SECRET, 60);
        let issued = codec
            .issue_at(&member(), Utc::now() - Duration::seconds(120))
            .unwrap();

        assert!(matches!(codec.verify(&issued.token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let ours = TokenCodec::new(SECRET, 3600);
        let theirs = TokenCodec::new(b"another-secret-that-is-long-enough", 3600);
        let issued = theirs.issue(&member()).unwrap();

        assert!(matches!(ours.verify(&issued.token), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = TokenCodec::new(SECRET, 3600);
        assert!(matches!(codec.verify("not-a-token"), Err(AuthError::MalformedToken)));
        assert!(matches!(codec.verify(""), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn non_key_identity_is_rejected() {
        let codec = TokenCodec::new(SECRET, 3600);
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            member_id: "admin".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET)).unwrap();

        assert!(matches!(codec.verify(&token), Err(AuthError::InvalidMemberId)));
    }
}
