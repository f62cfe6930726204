use super::UserStar;
use fs_err as fs;
use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

pub const STORAGE_KEY: &str = "stars";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed star letters: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence for the letter list. The whole list is replaced on every save.
pub trait LetterStore {
    /// `Ok(None)` when nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<UserStar>>, StorageError>;
    fn save(&mut self, stars: &[UserStar]) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Letters kept as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LetterStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<UserStar>>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, stars: &[UserStar]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(stars)?)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store holding the serialized text, shared between clones so a
/// second board can "reload" what the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Rc::new(RefCell::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl LetterStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<UserStar>>, StorageError> {
        self.raw
            .borrow()
            .as_deref()
            .map(serde_json::from_str::<Vec<UserStar>>)
            .transpose()
            .map_err(StorageError::from)
    }

    fn save(&mut self, stars: &[UserStar]) -> Result<(), StorageError> {
        *self.raw.borrow_mut() = Some(serde_json::to_string(stars)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        *self.raw.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<UserStar> {
        vec![UserStar {
            id: 1_700_000_000_000,
            x: 12.5,
            y: 40.0,
            message: "잘 자".to_string(),
        }]
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path().join("nested"));
        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(store.path().ends_with("stars.json"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_reports_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_stored_record_shape() {
        let mut store = MemoryStore::new();
        store.save(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&store.raw().unwrap()).unwrap();
        let record = &value[0];
        assert_eq!(record["id"], 1_700_000_000_000i64);
        assert_eq!(record["x"], 12.5);
        assert_eq!(record["message"], "잘 자");
    }
}
