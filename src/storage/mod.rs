// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! # Storage Module
//!
//! Two stores live under the data directory:
//!
//! ```text
//! {DATA_DIR}/
//!   chapter.redb        # Members, chairs, chair assignments
//!   pages/
//!     {slug}.json       # Page documents
//! ```
//!
//! Both are opened once at startup and handed to the router through
//! `AppState`. Neither is reached through globals.

pub mod database;
pub mod documents;

pub use database::{ChapterDatabase, StoreError, StoreResult, StoredMember, EXECUTIVE_CHAIRS, RUSH_CHAIRS};
pub use documents::{DocumentError, DocumentResult, DocumentStore};

/// File name of the roster database inside the data directory.
pub const DATABASE_FILE: &str = "chapter.redb";

/// Directory of page documents inside the data directory.
pub const PAGES_DIR: &str = "pages";
