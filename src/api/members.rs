// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Roster endpoints: committees, the brotherhood, chairs and new members.

use axum::extract::State;
use chrono::Utc;

use super::reply::{Payload, Reply, RouteResult};
use crate::{
    auth::{password, Auth},
    error::ApiError,
    models::{
        AddMemberResponse, AssignChairRequest, AssignChairResponse, BrothersResponse, ChairsResponse,
        CommitteeResponse, MemberId, NewMemberRequest,
    },
    state::AppState,
    storage::{StoredMember, EXECUTIVE_CHAIRS, RUSH_CHAIRS},
    validation::{abbreviate_state, is_valid_email, normalize_email, INVALID_EMAIL_MESSAGE},
};

/// Trim an optional text field, dropping it when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required_text(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required.")));
    }
    Ok(value.to_string())
}

/// Members holding a rush chair, with their school email.
#[utoipa::path(
    post,
    path = "/getRush",
    tag = "Roster",
    responses((status = 200, description = "Rush committee by chair id", body = CommitteeResponse))
)]
pub async fn get_rush(State(state): State<AppState>) -> RouteResult {
    let members = state.db.committee(&RUSH_CHAIRS)?;
    Reply::ok(CommitteeResponse {
        members,
        msg: "Got Rush Committee!".to_string(),
    })
}

/// Members of the executive committee.
#[utoipa::path(
    post,
    path = "/getEC",
    tag = "Roster",
    responses((status = 200, description = "Executive committee by chair id", body = CommitteeResponse))
)]
pub async fn get_ec(State(state): State<AppState>) -> RouteResult {
    let members = state
        .db
        .committee(&EXECUTIVE_CHAIRS)?
        .into_iter()
        .map(|mut member| {
            member.school_email = None;
            member
        })
        .collect();
    Reply::ok(CommitteeResponse {
        members,
        msg: "Got EC!".to_string(),
    })
}

/// Every initiated brother with the chairs he holds.
#[utoipa::path(
    post,
    path = "/getBros",
    tag = "Roster",
    responses((status = 200, description = "Initiates by last name", body = BrothersResponse))
)]
pub async fn get_bros(State(state): State<AppState>) -> RouteResult {
    let brothers = state.db.brothers()?;
    Reply::ok(BrothersResponse {
        brothers,
        msg: "Got Chapter!".to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/getChairs",
    tag = "Roster",
    responses((status = 200, description = "All chairs by id", body = ChairsResponse))
)]
pub async fn get_chairs(State(state): State<AppState>) -> RouteResult {
    Reply::ok(ChairsResponse {
        chairs: state.db.list_chairs()?,
    })
}

#[utoipa::path(
    post,
    path = "/addMember",
    request_body = NewMemberRequest,
    tag = "Roster",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Member added", body = AddMemberResponse),
        (status = 400, description = "Invalid member details"),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn add_member(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Payload(request): Payload<NewMemberRequest>,
) -> RouteResult {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request(INVALID_EMAIL_MESSAGE).into());
    }
    if request.password.is_empty() {
        return Err(ApiError::bad_request("Password is required.").into());
    }
    let school_email = optional_text(request.school_email).map(|email| normalize_email(&email));
    if let Some(school_email) = &school_email {
        if !is_valid_email(school_email) {
            return Err(ApiError::bad_request("Please enter a valid school email address.").into());
        }
    }

    let member = StoredMember {
        member_id: MemberId::generate(),
        email,
        school_email,
        password_hash: password::hash_password(&request.password)?,
        first_name: required_text(&request.first_name, "First name")?,
        last_name: required_text(&request.last_name, "Last name")?,
        status: request.status,
        phone: optional_text(request.phone),
        street: optional_text(request.street),
        city: optional_text(request.city),
        state: optional_text(request.state).map(|state| abbreviate_state(&state)),
        postal_code: optional_text(request.zip),
        initiation_year: request.initiation,
        graduation_year: request.graduation,
        created_at: Utc::now(),
    };
    state.db.add_member(&member)?;

    tracing::info!(
        member_id = %member.member_id,
        added_by = %caller.member_id,
        "Member added"
    );
    Reply::created(AddMemberResponse {
        member_id: member.member_id,
    })
}

#[utoipa::path(
    post,
    path = "/assignChair",
    request_body = AssignChairRequest,
    tag = "Roster",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Chair assigned", body = AssignChairResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Unknown member or chair")
    )
)]
pub async fn assign_chair(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Payload(request): Payload<AssignChairRequest>,
) -> RouteResult {
    let chair = state.db.assign_chair(&request.member_id, request.chair_id)?;

    tracing::info!(
        member_id = %request.member_id,
        chair_id = chair.chair_id,
        assigned_by = %caller.member_id,
        "Chair assigned"
    );
    Reply::ok(AssignChairResponse {
        member_id: request.member_id,
        chair_id: chair.chair_id,
        title: chair.title,
    })
}
