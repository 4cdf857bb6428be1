// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Client-side credential storage.
//!
//! The session token lives under [`TOKEN_STORAGE_KEY`]. The auth gate and
//! the login form read and write it through [`CredentialStore`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Key of the session token.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Small key-value store for credentials.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid credential key `{key}`"),
            ));
        }
        Ok(self.dir.join(key))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn CredentialStore) {
        assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap(), None);
        store.set(TOKEN_STORAGE_KEY, "abc.def.ghi").unwrap();
        assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap().as_deref(), Some("abc.def.ghi"));
        store.set(TOKEN_STORAGE_KEY, "renewed").unwrap();
        assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap().as_deref(), Some("renewed"));
        store.remove(TOKEN_STORAGE_KEY).unwrap();
        store.remove(TOKEN_STORAGE_KEY).unwrap();
        assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        exercise(&MemoryCredentialStore::new());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::open(dir.path().join("credentials")).unwrap();
        exercise(&store);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        FileCredentialStore::open(dir.path()).unwrap().set(TOKEN_STORAGE_KEY, "kept").unwrap();

        let reopened = FileCredentialStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(TOKEN_STORAGE_KEY).unwrap().as_deref(), Some("kept"));
        assert!(reopened.get("../token").is_err());
    }
}
