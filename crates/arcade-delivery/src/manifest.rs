//! Manifest loading and the membership rule it enables.

use std::sync::Arc;

use arcade_common::{
    artifact::Artifact,
    models::{Manifest, ManifestDocument},
};

use crate::store::ObjectStore;

pub struct ManifestLoader {
    objects: Arc<dyn ObjectStore>,
}

impl ManifestLoader {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    pub fn manifest_key(storage_prefix: &str) -> String {
        format!("{}/manifest.json", storage_prefix.trim_end_matches('/'))
    }

    /// Read `{prefix}/manifest.json`. Never fails; a missing manifest is normal.
    pub async fn load(&self, storage_prefix: &str) -> Artifact<Manifest> {
        let key = Self::manifest_key(storage_prefix);
        match self.objects.get(&key).await {
            Ok(bytes) => Artifact::<ManifestDocument>::from_json(bytes.as_deref()).map(Manifest::from),
            Err(e) => Artifact::Malformed(format!("read failed: {e:#}")),
        }
    }
}

/// Rewrite `requested` to the entrypoint when a manifest says the file doesn't exist.
///
/// Only manifests that list files act as a membership set.
pub fn gate<'a>(manifest: Option<&Manifest>, requested: &'a str, entrypoint: &'a str) -> &'a str {
    match manifest {
        Some(m) if m.has_files() && requested != entrypoint && !m.contains(requested) => entrypoint,
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryObjectStore;

    const MANIFEST: &str = r#"{
        "entrypoint": "index.html",
        "files": [
            {"path": "index.html", "contentType": "text/html"},
            {"path": "app.js", "contentType": "text/javascript"},
            {"path": "style.css"}
        ]
    }"#;

    #[tokio::test]
    async fn test_load_present_manifest() {
        let objects = MemoryObjectStore::default().with("builds/v1/manifest.json", MANIFEST);
        let loader = ManifestLoader::new(Arc::new(objects));

        let manifest = loader.load("builds/v1/").await.present().unwrap();
        assert_eq!(manifest.entrypoint.as_deref(), Some("index.html"));
        assert_eq!(manifest.files.len(), 3);
        assert_eq!(manifest.content_type("app.js"), Some("text/javascript"));
    }

    #[tokio::test]
    async fn test_missing_corrupt_and_unreadable_manifests_are_not_errors() {
        let absent = ManifestLoader::new(Arc::new(MemoryObjectStore::default()));
        assert_eq!(absent.load("builds/v1").await, Artifact::Absent);

        let corrupt = ManifestLoader::new(Arc::new(
            MemoryObjectStore::default().with("builds/v1/manifest.json", "[1, 2"),
        ));
        assert!(matches!(corrupt.load("builds/v1").await, Artifact::Malformed(_)));

        let failing = ManifestLoader::new(Arc::new(
            MemoryObjectStore::default().failing("builds/v1/manifest.json"),
        ));
        assert!(matches!(failing.load("builds/v1").await, Artifact::Malformed(_)));
    }

    #[test]
    fn test_gate_rewrites_non_members_to_entrypoint() {
        let doc: ManifestDocument = serde_json::from_str(MANIFEST).unwrap();
        let manifest = Manifest::from(doc);

        assert_eq!(gate(Some(&manifest), "app.js", "index.html"), "app.js");
        assert_eq!(gate(Some(&manifest), "index.html", "index.html"), "index.html");
        assert_eq!(gate(Some(&manifest), "missing.js", "index.html"), "index.html");
        assert_eq!(gate(Some(&manifest), "nonexistent.png", "index.html"), "index.html");
    }

    #[test]
    fn test_gate_passes_through_without_membership() {
        let empty = Manifest::default();
        assert_eq!(gate(Some(&empty), "missing.js", "index.html"), "missing.js");
        assert_eq!(gate(None, "missing.js", "index.html"), "missing.js");
    }
}
