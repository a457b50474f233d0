use std::{collections::BTreeMap, sync::RwLock};

use anyhow::{anyhow, Result};
use bytes::Bytes;

use crate::{store::ObjectStore, Error};

/// Simple in-memory object store.
/// Objects are kept per bucket in key order, so listings come out sorted.
#[derive(Debug, Default)]
pub struct MemStore {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, Bytes>>>,
}

impl MemStore {
    pub fn new() -> Self { Self::default() }

    /// Number of objects across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.read()
            .map(|buckets| buckets.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl ObjectStore for MemStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let buckets = self.buckets.read().map_err(|_| anyhow!("[store::mem] lock poisoned"))?;
        buckets.get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| Error::ObjectNotFound { bucket: bucket.to_string(), key: key.to_string() }.into())
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let buckets = self.buckets.read().map_err(|_| anyhow!("[store::mem] lock poisoned"))?;
        Ok(buckets.get(bucket)
            .map(|objects| {
                objects.range(prefix.to_string()..)
                    .take_while(|(key, _)| key.starts_with(prefix))
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<()> {
        let mut buckets = self.buckets.write().map_err(|_| anyhow!("[store::mem] lock poisoned"))?;
        buckets.entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), Bytes::copy_from_slice(body));
        Ok(())
    }
}
