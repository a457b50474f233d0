//! Object-storage access by `(bucket, key)`.

mod disk;
mod mem;
#[cfg(feature = "s3")]
mod s3;

use std::{fmt, path::Path};

use anyhow::{Context, Result};
use bytes::Bytes;

pub use disk::DiskStore;
pub use mem::MemStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Blocking object-storage client.
pub trait ObjectStore: Send + Sync {
    /// Fetch the full contents of one object.
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Keys in `bucket` starting with `prefix`, sorted.
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Store `body` under `key`, replacing any existing object.
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<()>;

    /// Copy one object to a local file.
    fn download_file(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let bytes = self.get_object(bucket, key)?;
        std::fs::write(local_path, &bytes)
            .with_context(|| format!("[store] Failed to write {bucket}/{key} to {}", local_path.display()))
    }
}

/// Identifies one blob in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), key: key.into() }
    }

    /// The last `/`-separated segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
