//! Durable storage for the cart.
//!
//! The cart persists as a single JSON document under a fixed key, the way a
//! browser keeps it in local storage. [`FileStorage`] maps the key to a file
//! in a directory; [`MemoryStorage`] keeps it in memory for tests and
//! throwaway sessions.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Fixed storage key for the persisted cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Local storage failed.
///
/// Never propagated out of the cart: a load failure resets to an empty
/// cart, a save failure is logged and the in-memory state stays
/// authoritative for the session.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cart storage I/O: {0}")]
    Io(#[from] io::Error),
}

/// Durable key-less storage for the serialized cart.
pub trait CartStorage: Send {
    /// Read the persisted document, `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the persisted document.
    fn save(&self, raw: &str) -> Result<(), PersistenceError>;
}

/// Cart storage backed by a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage under `dir`, using the fixed cart key as the file name.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{CART_STORAGE_KEY}.json")),
        }
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, raw: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Cart storage held in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: Mutex<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a persisted document.
    #[must_use]
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self
            .raw
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, raw: &str) -> Result<(), PersistenceError> {
        *self
            .raw
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(raw.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(storage.load().unwrap().is_none());
        storage.save("[1,2,3]").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("[1,2,3]"));
        storage.save("[]").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("deeper"));
        storage.save("{}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        storage.save("x").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("x"));

        let seeded = MemoryStorage::with_contents("seed");
        assert_eq!(seeded.load().unwrap().as_deref(), Some("seed"));
    }
}
