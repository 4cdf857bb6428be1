// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Axum extractor for authenticated members.
//!
//! Use the `Auth` extractor in handlers to require a session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(member): Auth) -> RouteResult {
//!     // member.member_id is a well-formed roster key
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedMember, TokenCodec};
use crate::models::MemberId;
use crate::state::AppState;

/// Validate the bearer token of a request.
///
/// Missing header, a scheme other than `Bearer`, an empty, forged or expired
/// token and a token naming something that is not a member id all fail.
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> Result<AuthenticatedMember, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)?;

    codec.verify(token)
}

/// Member id of an authenticated request, or `None` on any failure.
pub fn extract_member(headers: &HeaderMap, codec: &TokenCodec) -> Option<MemberId> {
    authenticate(headers, codec).ok().map(|member| member.member_id)
}

/// Extractor for authenticated members.
///
/// Rejects with a 401 failure envelope.
///
/// # Example
///
/// ```rust,ignore
/// async fn add_member(
///     Auth(member): Auth,
///     State(state): State<AppState>,
///     Payload(request): Payload<NewMemberRequest>,
/// ) -> RouteResult {
///     // ...
/// }
/// ```
pub struct Auth(pub AuthenticatedMember);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match authenticate(&parts.headers, &state.tokens) {
            Ok(member) => Ok(Auth(member)),
            Err(err) => {
                tracing::debug!(
                    path = %parts.uri.path(),
                    error_code = err.error_code(),
                    "Rejected unauthenticated request"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::http::{HeaderValue, Request};
    use chrono::{Duration, Utc};

    fn member() -> MemberId {
        MemberId::parse("65f1c2a9e4b0a1d2c3f4a5b6").unwrap()
    }

    fn parts_with(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn missing_header_is_rejected() {
        let codec = TokenCodec::new(b"test-secret-that-is-long-enough-123", 60);
        let headers = HeaderMap::new();
        assert!(matches!(authenticate(&headers, &codec), Err(AuthError::MissingAuthHeader)));
        assert!(extract_member(&headers, &codec).is_none());
    }

    #[test]
    fn wrong_scheme_and_empty_token_are_rejected() {
        let codec = TokenCodec::new(b"test-secret-that-is-long-enough-123", 60);
        let token = codec.issue(&member()).unwrap().token;

        for value in [format!("Basic {token}"), token.clone(), "Bearer ".to_string(), "Bearer    ".to_string()] {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
            assert!(
                matches!(authenticate(&headers, &codec), Err(AuthError::InvalidAuthHeader)),
                "header {value:?}"
            );
        }
    }

    #[test]
    fn non_utf8_header_is_rejected() {
        let codec = TokenCodec::new(b"test-secret-that-is-long-enough-123", 60);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap());
        assert!(extract_member(&headers, &codec).is_none());
    }

    #[test]
    fn expired_token_is_rejected_regardless_of_signature() {
        let codec = TokenCodec::new(b"test-secret-that-is-long-enough-123", 60);
        let token = codec
            .issue_at(&member(), Utc::now() - Duration::hours(3))
            .unwrap()
            .token;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        assert!(matches!(authenticate(&headers, &codec), Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let (state, _temp_dir) = test_state();
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_issued_token() {
        let (state, _temp_dir) = test_state();
        let token = state.tokens.issue(&member()).unwrap().token;
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let Auth(authenticated) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(authenticated.member_id, member());
    }
}
