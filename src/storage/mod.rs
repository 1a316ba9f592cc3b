//! Byte store for persisted artifacts such as compiled plans

mod errors;
mod os_fs;

pub use errors::StorageError;
pub use os_fs::OsFs;

/// Path-addressed byte store. Last writer wins; no locking.
pub trait ArtifactStore {
    /// Read an artifact. A missing path is [`StorageError::NotFound`].
    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write an artifact, creating missing parent directories.
    fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Whether an artifact exists. A missing path is `Ok(false)`, not an error.
    fn exists(&self, path: &str) -> Result<bool, StorageError>;
}
