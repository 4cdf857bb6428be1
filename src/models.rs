// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! # API Data Models
//!
//! Request and response bodies of the chapter API. Field names follow the
//! portal's JSON conventions (`camelCase`, with the short `fName`/`lName`
//! spelling on the add-member form). Every response body is wrapped in the
//! envelope before it leaves the server.
//!
//! ## Member Identifier
//!
//! [`MemberId`] is a 24-character lowercase hex string: four bytes of
//! creation time followed by eight random bytes. It is the only key used to
//! look members up, and the only identity a session token carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Member Identifier
// =============================================================================

/// Hex length of a member identifier.
pub const MEMBER_ID_LEN: usize = 24;

/// Object-id shaped member identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "65f1c2a9e4b0a1d2c3f4a5b6")]
pub struct MemberId(String);

impl MemberId {
    /// Parse and normalise an identifier. Returns `None` unless `raw` is
    /// exactly 24 hex digits.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == MEMBER_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(MemberId(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Create a fresh identifier.
    pub fn generate() -> Self {
        let seconds = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let random = uuid::Uuid::new_v4();

        let mut id = String::with_capacity(MEMBER_ID_LEN);
        for byte in seconds.to_be_bytes().iter().chain(&random.as_bytes()[..8]) {
            id.push_str(&format!("{byte:02x}"));
        }
        MemberId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MemberId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MemberId::parse(&value).ok_or_else(|| format!("invalid member id `{value}`"))
    }
}

impl From<MemberId> for String {
    fn from(value: MemberId) -> Self {
        value.0
    }
}

// =============================================================================
// Members
// =============================================================================

/// Membership standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MemberStatus {
    /// Initiated brother, listed on the chapter roster.
    Initiate,
    /// New member who has not been initiated yet.
    Associate,
    /// Graduated brother.
    Alumni,
}

/// Body of `POST /addMember`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewMemberRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "fName")]
    pub first_name: String,
    #[serde(rename = "lName")]
    pub last_name: String,
    pub status: MemberStatus,
    #[serde(default, rename = "schoolEmail")]
    pub school_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Full state name or postal abbreviation.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// Initiation year.
    #[serde(default)]
    pub initiation: Option<i32>,
    /// Expected or actual graduation year.
    #[serde(default)]
    pub graduation: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberResponse {
    pub member_id: MemberId,
}

// =============================================================================
// Committees and Roster
// =============================================================================

/// A member holding a chair, as listed on committee pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeMember {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub school_email: Option<String>,
    /// Title of the chair held.
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommitteeResponse {
    pub members: Vec<CommitteeMember>,
    pub msg: String,
}

/// Chair title held by a brother.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Position {
    pub title: String,
}

/// An initiated brother with every chair he holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brother {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub initiation_year: Option<i32>,
    /// Ordered by chair id.
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BrothersResponse {
    pub brothers: Vec<Brother>,
    pub msg: String,
}

// =============================================================================
// Chairs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chair {
    pub chair_id: u32,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChairsResponse {
    pub chairs: Vec<Chair>,
}

/// Body of `POST /assignChair`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignChairRequest {
    pub member_id: MemberId,
    pub chair_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignChairResponse {
    pub member_id: MemberId,
    pub chair_id: u32,
    pub title: String,
}

// =============================================================================
// Sessions
// =============================================================================

/// Body of `POST /login`.
///
/// Both fields are optional so that a missing one is answered with the
/// portal's own validation message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Issued session returned by `/login` and `/auth`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub member_id: MemberId,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Pages
// =============================================================================

/// Free-form page content kept in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: MemberId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageRequest {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetPageRequest {
    pub slug: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageListResponse {
    pub pages: Vec<String>,
}
