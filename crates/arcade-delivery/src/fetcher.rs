//! File fetching and the SPA fallback around it.

use std::sync::Arc;

use arcade_common::error::{DeliveryError, DeliveryResult};
use bytes::Bytes;
use tracing::debug;

use crate::store::ObjectStore;

/// Full storage key for a file inside a version.
pub fn object_key(storage_prefix: &str, file_path: &str) -> String {
    let prefix = storage_prefix.trim_end_matches('/');
    let file = file_path.trim_start_matches('/');
    if prefix.is_empty() {
        file.to_string()
    } else {
        format!("{prefix}/{file}")
    }
}

pub struct FileFetcher {
    objects: Arc<dyn ObjectStore>,
}

impl FileFetcher {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// One storage read. `Ok(None)` only when the object does not exist.
    pub async fn fetch(&self, storage_prefix: &str, file_path: &str) -> DeliveryResult<Option<Bytes>> {
        let key = object_key(storage_prefix, file_path);
        self.objects.get(&key).await.map_err(DeliveryError::Storage)
    }
}

/// A file that was found, and the path it was actually served from.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub path: String,
    pub bytes: Bytes,
    pub fell_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Primary,
    Fallback,
}

/// Fetch `requested`, substituting the entrypoint once if it is missing.
///
/// At most two storage reads. A storage error ends the attempt immediately;
/// only a genuine miss moves to the fallback stage.
pub async fn fetch_with_fallback(
    fetcher: &FileFetcher,
    storage_prefix: &str,
    requested: &str,
    entrypoint: &str,
) -> DeliveryResult<Option<Fetched>> {
    let mut stage = Stage::Primary;

    loop {
        let path = match stage {
            Stage::Primary => requested,
            Stage::Fallback => entrypoint,
        };

        if let Some(bytes) = fetcher.fetch(storage_prefix, path).await? {
            return Ok(Some(Fetched {
                path: path.to_string(),
                bytes,
                fell_back: stage == Stage::Fallback,
            }));
        }

        match stage {
            Stage::Primary if requested != entrypoint => {
                debug!(storage_prefix, requested, entrypoint, "File missing, falling back to entrypoint");
                stage = Stage::Fallback;
            }
            Stage::Primary | Stage::Fallback => return Ok(None),
        }
    }
}
