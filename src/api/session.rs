// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Login and session renewal.

use axum::extract::State;

use super::reply::{Payload, Reply, RouteResult};
use crate::{
    auth::{password, Auth, AuthError},
    error::ApiError,
    models::{LoginRequest, SessionResponse},
    state::AppState,
    validation::{is_valid_email, normalize_email, INVALID_EMAIL_MESSAGE, MISSING_CREDENTIALS_MESSAGE},
};

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Session",
    responses(
        (status = 200, description = "Session issued", body = SessionResponse),
        (status = 400, description = "Missing or malformed credentials"),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Payload(request): Payload<LoginRequest>,
) -> RouteResult {
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let secret = request.password.as_deref().unwrap_or_default();
    if email.is_empty() || secret.is_empty() {
        return Err(ApiError::bad_request(MISSING_CREDENTIALS_MESSAGE).into());
    }
    if !is_valid_email(email) {
        return Err(ApiError::bad_request(INVALID_EMAIL_MESSAGE).into());
    }

    let member = state
        .db
        .find_by_email(&normalize_email(email))?
        .ok_or(AuthError::InvalidCredentials)?;
    if !password::verify_password(secret, &member.password_hash)? {
        tracing::info!(member_id = %member.member_id, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let issued = state.tokens.issue(&member.member_id)?;
    tracing::info!(member_id = %member.member_id, "Member logged in");

    Reply::ok(SessionResponse {
        token: issued.token,
        member_id: member.member_id,
        expires_at: issued.expires_at,
    })
}

/// Confirm a session and hand back a fresh token.
#[utoipa::path(
    post,
    path = "/auth",
    tag = "Session",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Session valid, token renewed", body = SessionResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn check_session(Auth(member): Auth, State(state): State<AppState>) -> RouteResult {
    if state.db.get_member(&member.member_id)?.is_none() {
        return Err(AuthError::UnknownMember.into());
    }

    let issued = state.tokens.issue(&member.member_id)?;
    Reply::ok(SessionResponse {
        token: issued.token,
        member_id: member.member_id,
        expires_at: issued.expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::models::{MemberId, MemberStatus};
    use crate::test_support::{add_member, test_state};
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    fn login_request(email: &str, password: &str) -> Payload<LoginRequest> {
        Payload(LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        })
    }

    fn message_of(err: RouteError) -> String {
        match err {
            RouteError::Api(err) => err.message,
            RouteError::Internal(err) => panic!("unexpected internal error: {err}"),
        }
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let (state, _dir) = test_state();
        let id = add_member(&state, "Sam", "Rivera", "sam@example.edu", "hunter22", MemberStatus::Initiate);

        let reply = login(State(state.clone()), login_request("Sam@Example.edu ", "hunter22"))
            .await
            .expect("login succeeds");
        assert_eq!(reply.status(), StatusCode::OK);

        let bytes = to_bytes(reply.into_response().into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["memberId"], id.as_str());

        let token = body["token"].as_str().expect("token in payload");
        assert_eq!(state.tokens.verify(token).unwrap().member_id, id);
    }

    #[tokio::test]
    async fn login_validates_input_before_lookup() {
        let (state, _dir) = test_state();

        let err = login(State(state.clone()), Payload(LoginRequest::default())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message_of(err), MISSING_CREDENTIALS_MESSAGE);

        let err = login(State(state.clone()), login_request("not-an-email", "pw")).await.unwrap_err();
        assert_eq!(message_of(err), INVALID_EMAIL_MESSAGE);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let (state, _dir) = test_state();
        add_member(&state, "Sam", "Rivera", "sam@example.edu", "hunter22", MemberStatus::Initiate);

        let err = login(State(state.clone()), login_request("sam@example.edu", "wrong")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message_of(err), "Invalid email or password.");

        let err = login(State(state.clone()), login_request("nobody@example.edu", "hunter22"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_check_requires_existing_member() {
        let (state, _dir) = test_state();
        let ghost = MemberId::generate();
        let issued = state.tokens.issue(&ghost).unwrap();
        let member = state.tokens.verify(&issued.token).unwrap();

        let err = check_session(Auth(member), State(state.clone())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let id = add_member(&state, "Sam", "Rivera", "sam@example.edu", "hunter22", MemberStatus::Initiate);
        let issued = state.tokens.issue(&id).unwrap();
        let member = state.tokens.verify(&issued.token).unwrap();
        let reply = check_session(Auth(member), State(state)).await.unwrap();
        assert_eq!(reply.status(), StatusCode::OK);
    }
}
