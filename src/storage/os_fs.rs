use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ArtifactStore, StorageError};

/// [`ArtifactStore`] over a directory of the local filesystem
#[derive(Debug, Clone)]
pub struct OsFs {
    base_path: PathBuf,
}

impl OsFs {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        OsFs {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl ArtifactStore for OsFs {
    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.full_path(path);
        fs::read(&full).map_err(|e| StorageError::from_io(full, e))
    }

    fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full = self.full_path(path);
        if let Some(dir) = full.parent() {
            if !dir.exists() {
                log::debug!("storage: creating {}", dir.display());
                fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(&full, data).map_err(|source| StorageError::Io { path: full, source })
    }

    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.full_path(path);
        match fs::metadata(&full) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Io { path: full, source }),
        }
    }
}
