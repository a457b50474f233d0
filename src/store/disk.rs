use std::{io::ErrorKind, path::{Component, Path, PathBuf}};

use anyhow::{Context, Result};
use bytes::Bytes;
use walkdir::WalkDir;

use crate::{fs::ensure_dir_exists, store::ObjectStore, Error};

/// Disk-backed object store: each bucket is a directory under `root`,
/// each key a `/`-separated path inside it.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf> {
        check_relative(bucket)?;
        if bucket.contains('/') {
            return Err(Error::InvalidKey { key: bucket.to_string(), reason: "bucket names cannot contain '/'" }.into());
        }
        Ok(self.root.join(bucket))
    }

    fn full(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        check_relative(key)?;
        Ok(self.bucket_dir(bucket)?.join(key))
    }
}

/// Keys must be plain relative paths: no empty, `.`, `..` or root components.
fn check_relative(key: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidKey { key: key.to_string(), reason };

    if key.is_empty() { return Err(invalid("empty").into()); }
    if key.starts_with('/') { return Err(invalid("absolute").into()); }
    if key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(invalid("empty, '.' or '..' path segment").into());
    }
    if !Path::new(key).components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(invalid("not a relative path").into());
    }
    Ok(())
}

impl ObjectStore for DiskStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let path = self.full(bucket, key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::ObjectNotFound { bucket: bucket.to_string(), key: key.to_string() }.into())
            },
            Err(e) => Err(e).with_context(|| format!("[store::disk] Failed to read {}", path.display())),
        }
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let dir = self.bucket_dir(bucket)?;
        if !dir.is_dir() { return Ok(Vec::new()); }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&dir) {
            let entry = entry.with_context(|| format!("[store::disk] Failed to walk {}", dir.display()))?;
            if !entry.file_type().is_file() { continue; }

            let rel = entry.path().strip_prefix(&dir)
                .with_context(|| format!("[store::disk] {} escaped {}", entry.path().display(), dir.display()))?;
            let key = rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<()> {
        let path = self.full(bucket, key)?;
        if let Some(parent) = path.parent() {
            ensure_dir_exists(parent)?;
        }
        std::fs::write(&path, body)
            .with_context(|| format!("[store::disk] Failed to write {}", path.display()))
    }

    fn download_file(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let path = self.full(bucket, key)?;
        if !path.is_file() {
            return Err(Error::ObjectNotFound { bucket: bucket.to_string(), key: key.to_string() }.into());
        }
        std::fs::copy(&path, local_path)
            .with_context(|| format!("[store::disk] Failed to copy {} to {}", path.display(), local_path.display()))?;
        Ok(())
    }
}
