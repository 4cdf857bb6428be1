// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Shared application context.
//!
//! Built once by [`AppState::open`] and passed to the router. Stores are
//! opened here and released by [`AppState::close`].

use std::sync::Arc;

use chrono::Utc;

use crate::auth::{password, AuthError, TokenCodec};
use crate::config::{Config, SeedAdmin};
use crate::models::{MemberId, MemberStatus};
use crate::storage::{
    ChapterDatabase, DocumentError, DocumentStore, StoreError, StoredMember, DATABASE_FILE, PAGES_DIR,
};
use crate::validation::normalize_email;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to open roster database: {0}")]
    Store(#[from] StoreError),

    #[error("failed to open document store: {0}")]
    Documents(#[from] DocumentError),

    #[error("failed to seed admin member: {0}")]
    Seed(#[from] AuthError),
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ChapterDatabase>,
    pub documents: Arc<DocumentStore>,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(db: ChapterDatabase, documents: DocumentStore, tokens: TokenCodec) -> Self {
        Self {
            db: Arc::new(db),
            documents: Arc::new(documents),
            tokens: Arc::new(tokens),
        }
    }

    /// Open both stores under the configured data directory.
    pub fn open(config: &Config) -> Result<Self, StartupError> {
        let db = ChapterDatabase::open(&config.data_dir.join(DATABASE_FILE))?;
        let documents = DocumentStore::open(config.data_dir.join(PAGES_DIR))?;
        let tokens = TokenCodec::new(config.session_secret.as_bytes(), config.session_ttl_secs);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            pages = %documents.root().display(),
            "Opened chapter stores"
        );
        Ok(Self::new(db, documents, tokens))
    }

    /// Create the bootstrap member unless the email is already registered.
    ///
    /// Returns the id of the created member, if any.
    pub fn seed_admin(&self, seed: &SeedAdmin) -> Result<Option<MemberId>, StartupError> {
        let email = normalize_email(&seed.email);
        if self.db.find_by_email(&email)?.is_some() {
            return Ok(None);
        }

        let member = StoredMember {
            member_id: MemberId::generate(),
            email,
            school_email: None,
            password_hash: password::hash_password(&seed.password)?,
            first_name: "Chapter".to_string(),
            last_name: "Admin".to_string(),
            status: MemberStatus::Initiate,
            phone: None,
            street: None,
            city: None,
            state: None,
            postal_code: None,
            initiation_year: None,
            graduation_year: None,
            created_at: Utc::now(),
        };
        self.db.add_member(&member)?;

        tracing::info!(member_id = %member.member_id, "Seeded admin member");
        Ok(Some(member.member_id))
    }

    /// Release the stores.
    ///
    /// The roster database is closed when the last clone of the state is
    /// dropped; handlers still running keep it alive until they finish.
    pub fn close(self) {
        let outstanding = Arc::strong_count(&self.db).saturating_sub(1);
        tracing::info!(outstanding, "Closing chapter stores");
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_config, test_state};
    use tempfile::TempDir;

    #[test]
    fn open_creates_stores_under_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let state = AppState::open(&config).unwrap();

        assert!(dir.path().join(DATABASE_FILE).exists());
        assert!(dir.path().join(PAGES_DIR).is_dir());
        assert_eq!(state.db.member_count().unwrap(), 0);
        state.close();
    }

    #[test]
    fn seed_admin_is_idempotent() {
        let (state, _dir) = test_state();
        let seed = SeedAdmin {
            email: "President@Example.edu".to_string(),
            password: "initial-password".to_string(),
        };

        let created = state.seed_admin(&seed).unwrap();
        assert!(created.is_some());
        assert_eq!(state.seed_admin(&seed).unwrap(), None);

        let member = state.db.find_by_email("president@example.edu").unwrap().unwrap();
        assert!(password::verify_password("initial-password", &member.password_hash).unwrap());
    }
}
