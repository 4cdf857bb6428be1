// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Embedded chapter database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `members`: member_id → serialized StoredMember
//! - `member_emails`: lowercase email → member_id
//! - `chairs`: chair_id → title
//! - `member_chairs`: member_id → chair_id (multimap)
//! - `chair_members`: chair_id → member_id (multimap)
//!
//! Multimap values come back sorted, so a member's positions are already in
//! chair order.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{
    Database, MultimapTableDefinition, ReadTransaction, ReadableDatabase,
    ReadableTable, ReadableTableMetadata, TableDefinition,
};
use serde::{Deserialize, Serialize};

use crate::models::{Brother, Chair, CommitteeMember, MemberId, MemberStatus, Position};

// =============================================================================
// Table Definitions
// =============================================================================

const MEMBERS: TableDefinition<&str, &[u8]> = TableDefinition::new("members");

const MEMBER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("member_emails");

const CHAIRS: TableDefinition<u32, &str> = TableDefinition::new("chairs");

const MEMBER_CHAIRS: MultimapTableDefinition<&str, u32> = MultimapTableDefinition::new("member_chairs");

const CHAIR_MEMBERS: MultimapTableDefinition<u32, &str> = MultimapTableDefinition::new("chair_members");

/// Chairs seated on the Executive Council.
pub const EXECUTIVE_CHAIRS: [u32; 5] = [1, 2, 3, 4, 5];

/// Chairs seated on the Rush Committee.
pub const RUSH_CHAIRS: [u32; 3] = [3, 15, 16];

/// Chairs created when the database is first opened.
pub const DEFAULT_CHAIRS: [(u32, &str); 16] = [
    (1, "President"),
    (2, "Vice President"),
    (3, "Rush Chairman"),
    (4, "Treasurer"),
    (5, "Secretary"),
    (6, "Social Chairman"),
    (7, "Scholarship Chairman"),
    (8, "Philanthropy Chairman"),
    (9, "Risk Manager"),
    (10, "House Manager"),
    (11, "Alumni Relations Chairman"),
    (12, "Historian"),
    (13, "Athletics Chairman"),
    (14, "Ritual Chairman"),
    (15, "Rush Co-Chairman"),
    (16, "Recruitment Assistant"),
];

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Stored Records
// =============================================================================

/// Member record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMember {
    pub member_id: MemberId,
    /// Login email, lowercase.
    pub email: String,
    pub school_email: Option<String>,
    /// Argon2id PHC string. Never leaves the server.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub status: MemberStatus,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub initiation_year: Option<i32>,
    pub graduation_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// ChapterDatabase
// =============================================================================

/// Roster database: members, chairs and who holds which chair.
pub struct ChapterDatabase {
    db: Database,
}

impl ChapterDatabase {
    /// Open (or create) the database at the given path.
    ///
    /// Missing default chairs are inserted; existing titles are kept.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MEMBERS)?;
            let _ = write_txn.open_table(MEMBER_EMAILS)?;
            let _ = write_txn.open_multimap_table(MEMBER_CHAIRS)?;
            let _ = write_txn.open_multimap_table(CHAIR_MEMBERS)?;

            let mut chairs = write_txn.open_table(CHAIRS)?;
            for (chair_id, title) in DEFAULT_CHAIRS {
                if chairs.get(chair_id)?.is_none() {
                    chairs.insert(chair_id, title)?;
                }
            }
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Insert a member. Fails if the id or the email is taken.
    pub fn add_member(&self, member: &StoredMember) -> StoreResult<()> {
        let json = serde_json::to_vec(member)?;
        let email = member.email.trim().to_lowercase();

        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(MEMBER_EMAILS)?;
            if emails.get(email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("Member with email {email}")));
            }

            let mut members = write_txn.open_table(MEMBERS)?;
            if members.get(member.member_id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("Member {}", member.member_id)));
            }

            members.insert(member.member_id.as_str(), json.as_slice())?;
            emails.insert(email.as_str(), member.member_id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a member by id.
    pub fn get_member(&self, member_id: &MemberId) -> StoreResult<Option<StoredMember>> {
        let read_txn = self.db.begin_read()?;
        read_member(&read_txn, member_id.as_str())
    }

    /// Look up a member by login email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredMember>> {
        let email = email.trim().to_lowercase();
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(MEMBER_EMAILS)?;

        let member_id = match emails.get(email.as_str())? {
            Some(id) => id.value().to_string(),
            None => return Ok(None),
        };
        read_member(&read_txn, &member_id)
    }

    pub fn member_count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let members = read_txn.open_table(MEMBERS)?;
        Ok(members.len()?)
    }

    // =========================================================================
    // Chairs
    // =========================================================================

    /// All chairs ordered by id.
    pub fn list_chairs(&self) -> StoreResult<Vec<Chair>> {
        let read_txn = self.db.begin_read()?;
        let chairs = read_txn.open_table(CHAIRS)?;

        let mut result = Vec::new();
        for entry in chairs.iter()? {
            let (chair_id, title) = entry?;
            result.push(Chair {
                chair_id: chair_id.value(),
                title: title.value().to_string(),
            });
        }
        Ok(result)
    }

    /// Seat a member in a chair. Assigning twice is a no-op.
    pub fn assign_chair(&self, member_id: &MemberId, chair_id: u32) -> StoreResult<Chair> {
        let write_txn = self.db.begin_write()?;
        let title = {
            let members = write_txn.open_table(MEMBERS)?;
            if members.get(member_id.as_str())?.is_none() {
                return Err(StoreError::NotFound(format!("Member {member_id}")));
            }

            let chairs = write_txn.open_table(CHAIRS)?;
            let title = match chairs.get(chair_id)? {
                Some(title) => title.value().to_string(),
                None => return Err(StoreError::NotFound(format!("Chair {chair_id}"))),
            };

            let mut member_chairs = write_txn.open_multimap_table(MEMBER_CHAIRS)?;
            member_chairs.insert(member_id.as_str(), chair_id)?;
            let mut chair_members = write_txn.open_multimap_table(CHAIR_MEMBERS)?;
            chair_members.insert(chair_id, member_id.as_str())?;

            title
        };
        write_txn.commit()?;

        Ok(Chair { chair_id, title })
    }

    // =========================================================================
    // Roster Queries
    // =========================================================================

    /// Holders of the given chairs, ordered by chair id.
    ///
    /// Unknown chair ids are skipped.
    pub fn committee(&self, chair_ids: &[u32]) -> StoreResult<Vec<CommitteeMember>> {
        let mut chair_ids = chair_ids.to_vec();
        chair_ids.sort_unstable();
        chair_ids.dedup();

        let read_txn = self.db.begin_read()?;
        let chairs = read_txn.open_table(CHAIRS)?;
        let chair_members = read_txn.open_multimap_table(CHAIR_MEMBERS)?;

        let mut result = Vec::new();
        for chair_id in chair_ids {
            let title = match chairs.get(chair_id)? {
                Some(title) => title.value().to_string(),
                None => continue,
            };

            for holder in chair_members.get(chair_id)? {
                let holder = holder?;
                if let Some(member) = read_member(&read_txn, holder.value())? {
                    result.push(CommitteeMember {
                        member_id: member.member_id,
                        first_name: member.first_name,
                        last_name: member.last_name,
                        school_email: member.school_email,
                        title: title.clone(),
                    });
                }
            }
        }
        Ok(result)
    }

    /// Initiated brothers ordered by last name, each with his positions.
    ///
    /// Runs in a single read transaction: the roster and every position
    /// lookup see the same snapshot, and a failure anywhere yields no data.
    pub fn brothers(&self) -> StoreResult<Vec<Brother>> {
        let read_txn = self.db.begin_read()?;
        let members = read_txn.open_table(MEMBERS)?;
        let chairs = read_txn.open_table(CHAIRS)?;
        let member_chairs = read_txn.open_multimap_table(MEMBER_CHAIRS)?;

        let mut initiates = Vec::new();
        for entry in members.iter()? {
            let (_, value) = entry?;
            let member: StoredMember = serde_json::from_slice(value.value())?;
            if member.status == MemberStatus::Initiate {
                initiates.push(member);
            }
        }
        initiates.sort_by(|a, b| {
            a.last_name
                .to_lowercase()
                .cmp(&b.last_name.to_lowercase())
                .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        });

        let mut brothers = Vec::with_capacity(initiates.len());
        for member in initiates {
            let mut positions = Vec::new();
            for chair_id in member_chairs.get(member.member_id.as_str())? {
                let chair_id = chair_id?.value();
                if let Some(title) = chairs.get(chair_id)? {
                    positions.push(Position {
                        title: title.value().to_string(),
                    });
                }
            }

            brothers.push(Brother {
                member_id: member.member_id,
                first_name: member.first_name,
                last_name: member.last_name,
                initiation_year: member.initiation_year,
                positions,
            });
        }
        Ok(brothers)
    }
}

fn read_member(read_txn: &ReadTransaction, member_id: &str) -> StoreResult<Option<StoredMember>> {
    let members = read_txn.open_table(MEMBERS)?;
    match members.get(member_id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}
