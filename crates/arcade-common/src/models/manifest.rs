//! Per-version `manifest.json`: declared entrypoint and known files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire shape of `manifest.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub path: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Loaded manifest, indexed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entrypoint: Option<String>,
    /// Path (no leading `/`) → declared content type.
    pub files: HashMap<String, Option<String>>,
}

impl From<ManifestDocument> for Manifest {
    fn from(doc: ManifestDocument) -> Self {
        let files = doc
            .files
            .into_iter()
            .filter_map(|entry| {
                let path = entry.path.trim_start_matches('/').to_string();
                (!path.is_empty()).then_some((path, entry.content_type))
            })
            .collect();

        Self {
            entrypoint: doc
                .entrypoint
                .map(|e| e.trim_start_matches('/').to_string())
                .filter(|e| !e.is_empty()),
            files,
        }
    }
}

impl Manifest {
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path.trim_start_matches('/'))
    }

    /// Declared content type for `path`, if the manifest lists one.
    pub fn content_type(&self, path: &str) -> Option<&str> {
        self.files
            .get(path.trim_start_matches('/'))
            .and_then(|ct| ct.as_deref())
            .filter(|ct| !ct.is_empty())
    }

    /// Whether the manifest can act as a membership set.
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}
