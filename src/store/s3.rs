use anyhow::{Context, Result};
use aws_sdk_s3::{error::ProvideErrorMetadata, primitives::ByteStream, Client};
use bytes::Bytes;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::{store::ObjectStore, Error};

/// Object store backed by S3 (or an S3-compatible service).
///
/// The SDK is async; calls are driven to completion on a private
/// current-thread runtime, so this store must not be used from inside
/// another tokio runtime.
pub struct S3Store {
    client: Client,
    runtime: Runtime,
}

impl S3Store {
    /// Wrap an already-configured SDK client.
    pub fn new(client: Client) -> Result<Self> {
        Ok(Self { client, runtime: runtime()? })
    }

    /// Build a client from the standard AWS provider chain (environment, profile, IMDS).
    pub fn from_env() -> Result<Self> {
        let runtime = runtime()?;
        let config = runtime.block_on(aws_config::load_defaults(aws_config::BehaviorVersion::latest()));
        Ok(Self { client: Client::new(&config), runtime })
    }
}

fn runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .context("[store::s3] Failed to start runtime")
}

impl ObjectStore for S3Store {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        debug!("Downloading s3://{}/{}", bucket, key);
        self.runtime.block_on(async {
            let response = match self.client.get_object().bucket(bucket).key(key).send().await {
                Ok(response) => response,
                Err(e) if e.code() == Some("NoSuchKey") => {
                    return Err(Error::ObjectNotFound { bucket: bucket.to_string(), key: key.to_string() }.into());
                },
                Err(e) => return Err(e).with_context(|| format!("[store::s3] Failed to get s3://{bucket}/{key}")),
            };
            let data = response.body
                .collect()
                .await
                .with_context(|| format!("[store::s3] Failed to read body of s3://{bucket}/{key}"))?
                .into_bytes();
            debug!("Downloaded {} bytes from s3://{}/{}", data.len(), bucket, key);
            Ok(data)
        })
    }

    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        debug!("Listing s3://{}/{}", bucket, prefix);
        self.runtime.block_on(async {
            let mut keys = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let response = self.client
                    .list_objects_v2()
                    .bucket(bucket)
                    .prefix(prefix)
                    .set_continuation_token(token.take())
                    .send()
                    .await
                    .with_context(|| format!("[store::s3] Failed to list s3://{bucket}/{prefix}"))?;

                keys.extend(response.contents().iter().filter_map(|obj| obj.key().map(str::to_string)));

                match response.next_continuation_token() {
                    Some(next) if response.is_truncated().unwrap_or(false) => token = Some(next.to_string()),
                    _ => break,
                }
            }
            keys.sort();
            Ok(keys)
        })
    }

    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<()> {
        debug!("Uploading {} bytes to s3://{}/{}", body.len(), bucket, key);
        self.runtime.block_on(async {
            self.client
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(ByteStream::from(body.to_vec()))
                .send()
                .await
                .with_context(|| format!("[store::s3] Failed to put s3://{bucket}/{key}"))?;
            Ok(())
        })
    }
}
