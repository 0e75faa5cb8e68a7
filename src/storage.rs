//! Document persistence
//!
//! The editor never touches the filesystem directly; it hands the whole
//! document to a [`Storage`] implementation.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persistence error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}: not a regular file")]
    NotAFile(PathBuf),
}

/// Load and save whole documents by path
pub trait Storage {
    /// Read a document; `Ok(None)` when it does not exist yet
    fn load(&mut self, path: &Path) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the document at `path` with `bytes`
    fn save(&mut self, path: &Path, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl Storage for FileStorage {
    fn load(&mut self, path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::metadata(path) {
            Ok(meta) if !meta.is_file() => return Err(StorageError::NotAFile(path.to_path_buf())),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let bytes = fs::read(path)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "loaded file");
        Ok(Some(bytes))
    }

    fn save(&mut self, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        fs::write(path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved file");
        Ok(())
    }
}

/// In-memory documents for scripted sessions and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Vec<u8>>,
    /// Fail every save, for exercising error paths
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose saves always fail
    pub fn read_only() -> Self {
        Self {
            files: HashMap::new(),
            read_only: true,
        }
    }

    /// Seed a document
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self, path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.files.get(path).cloned())
    }

    fn save(&mut self, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only storage").into());
        }
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut storage = FileStorage;

        assert!(storage.load(&path).unwrap().is_none());
        storage.save(&path, b"hello\n").unwrap();
        assert_eq!(storage.load(&path).unwrap().as_deref(), Some(&b"hello\n"[..]));
    }

    #[test]
    fn test_file_storage_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage;
        assert!(matches!(
            storage.load(dir.path()),
            Err(StorageError::NotAFile(_))
        ));
        assert!(storage.save(dir.path(), b"x").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        storage.insert("a.txt", "abc");
        assert_eq!(storage.load(Path::new("a.txt")).unwrap(), Some(b"abc".to_vec()));
        assert_eq!(storage.load(Path::new("b.txt")).unwrap(), None);

        storage.save(Path::new("b.txt"), b"xyz").unwrap();
        assert_eq!(storage.get(Path::new("b.txt")), Some(&b"xyz"[..]));

        let mut locked = MemoryStorage::read_only();
        assert!(locked.save(Path::new("c.txt"), b"1").is_err());
    }
}
