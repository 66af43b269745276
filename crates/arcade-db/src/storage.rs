//! MinIO / S3-compatible object storage client.
//!
//! Wraps `aws-sdk-s3` for the read path: published bundles are only ever read
//! here, never written.

use anyhow::{Context, Result};
use arcade_common::config::StorageConfig;
use aws_sdk_s3::{
    Client,
    config::{Builder as S3Builder, Credentials, Region},
    error::SdkError,
    operation::get_object::GetObjectError,
};
use bytes::Bytes;

/// Read-only S3/MinIO client for one bucket.
#[derive(Clone)]
pub struct StorageClient {
    inner: Client,
    bucket: String,
}

impl StorageClient {
    /// Initialise client from config.
    pub fn new(cfg: &StorageConfig) -> Result<Self> {
        anyhow::ensure!(!cfg.bucket.trim().is_empty(), "storage.bucket is not set");

        let creds = Credentials::new(
            &cfg.access_key,
            &cfg.secret_key,
            None, // session token
            None, // expiry
            "arcade-storage",
        );

        let mut builder = S3Builder::new()
            .credentials_provider(creds)
            .region(Region::new(cfg.region.clone()))
            .force_path_style(cfg.force_path_style);

        if !cfg.endpoint.trim().is_empty() {
            builder = builder.endpoint_url(&cfg.endpoint);
        }

        Ok(Self {
            inner: Client::from_conf(builder.build()),
            bucket: cfg.bucket.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Read an object in full.
    ///
    /// Returns `Ok(None)` when the object does not exist. Every other failure
    /// (transport, auth, throttling) is an error.
    pub async fn get_object(&self, key: &str) -> Result<Option<Bytes>> {
        let result = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Err(SdkError::ServiceError(err))
                if is_missing_object(err.err(), err.raw().status().as_u16()) =>
            {
                tracing::debug!(key, "Object not found");
                return Ok(None);
            }
            other => other.with_context(|| format!("Failed to read {key} from object storage"))?,
        };

        let data = output
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to stream {key} from object storage"))?;

        Ok(Some(data.into_bytes()))
    }
}

fn is_missing_object(err: &GetObjectError, status: u16) -> bool {
    read_outcome(err.is_no_such_key(), status) == ReadOutcome::Missing
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadOutcome {
    Missing,
    Failed,
}

/// Classify a rejected `GetObject`.
///
/// Some S3-compatible stores answer a missing key with a bare 404 instead of
/// `NoSuchKey`. Anything else (denied, throttled, server error) is a failure.
fn read_outcome(no_such_key: bool, status: u16) -> ReadOutcome {
    if no_such_key || status == 404 {
        ReadOutcome::Missing
    } else {
        ReadOutcome::Failed
    }
}
