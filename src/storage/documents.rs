// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! JSON document store for auxiliary content.
//!
//! Each document is one pretty-printed JSON file named `{id}.json` inside
//! the store directory. Writes go to a temp file first and are renamed into
//! place, so readers never see a half-written document.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

const EXTENSION: &str = "json";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid document id `{0}`")]
    InvalidId(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Directory of JSON documents keyed by id.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Open the store, creating its directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> DocumentResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> DocumentResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if !valid {
            return Err(DocumentError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{EXTENSION}")))
    }

    /// Read and deserialize a document.
    pub fn read<T: DeserializeOwned>(&self, id: &str) -> DocumentResult<T> {
        let path = self.path_for(id)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DocumentError::NotFound(format!("Document {id}")))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Write a document (atomic write via rename).
    pub fn write<T: Serialize>(&self, id: &str, value: &T) -> DocumentResult<()> {
        let path = self.path_for(id)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    /// Ids of all documents, sorted.
    pub fn list(&self) -> DocumentResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != EXTENSION) {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Verify the directory accepts writes.
    pub fn health_check(&self) -> DocumentResult<()> {
        let probe = self.root.join(".health_check");
        fs::write(&probe, b"ok")?;
        fs::remove_file(&probe)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    fn store() -> (DocumentStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("pages")).unwrap();
        (store, dir)
    }

    #[test]
    fn write_then_read() {
        let (store, _dir) = store();
        let note = Note { text: "Rush starts Monday".into() };
        store.write("rush-week", &note).unwrap();

        assert_eq!(store.read::<Note>("rush-week").unwrap(), note);
        assert!(!store.root().join("rush-week.tmp").exists());
    }

    #[test]
    fn missing_document_is_not_found() {
        let (store, _dir) = store();
        assert!(matches!(store.read::<Note>("nothing"), Err(DocumentError::NotFound(_))));
    }

    #[test]
    fn path_traversal_is_rejected() {
        let (store, _dir) = store();
        let note = Note { text: "x".into() };
        assert!(matches!(store.write("../escape", &note), Err(DocumentError::InvalidId(_))));
        assert!(matches!(store.read::<Note>("../escape"), Err(DocumentError::InvalidId(_))));
        assert!(!store.root().join("../escape.json").exists());
    }

    #[test]
    fn list_returns_sorted_ids() {
        let (store, _dir) = store();
        for id in ["history", "about", "rush-week"] {
            store.write(id, &Note { text: id.into() }).unwrap();
        }
        fs::write(store.root().join("stray.txt"), b"ignored").unwrap();

        assert_eq!(store.list().unwrap(), ["about", "history", "rush-week"]);
    }

    #[test]
    fn health_check_passes_on_writable_dir() {
        let (store, _dir) = store();
        store.health_check().unwrap();
    }
}
