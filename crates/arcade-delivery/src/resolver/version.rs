//! Version resolution: which storage prefix holds the files to serve.
//!
//! Implemented as an ordered list of [`VersionStrategy`] tiers; the first tier
//! that yields a version wins and later tiers are never consulted:
//!
//! 1. [`LiveVersionPointer`] — the project's live (or domain-pinned) version record
//! 2. [`LegacyMarker`] — `{owner}/{project}/latest.json` from before versions existed
//! 3. [`ProjectBasePath`] — the bare project directory, for the oldest publishes

use std::sync::Arc;

use arcade_common::{
    artifact::Artifact,
    error::DeliveryResult,
    models::Project,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::store::{ObjectStore, ProjectStore};

/// Which tier produced a [`ResolvedVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    LivePointer,
    LegacyMarker,
    BasePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Storage prefix without a trailing separator.
    pub storage_prefix: String,
    pub entrypoint: String,
    pub source: VersionSource,
}

/// One tier of version resolution.
#[async_trait]
pub trait VersionStrategy: Send + Sync {
    /// `Ok(None)` hands over to the next tier; `Err` fails the request.
    async fn resolve(&self, project: &Project) -> DeliveryResult<Option<ResolvedVersion>>;
}

pub struct VersionResolver {
    strategies: Vec<Box<dyn VersionStrategy>>,
}

impl VersionResolver {
    pub fn new(strategies: Vec<Box<dyn VersionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Live pointer → legacy marker → base path.
    pub fn standard(
        store: Arc<dyn ProjectStore>,
        objects: Arc<dyn ObjectStore>,
        default_entrypoint: &str,
    ) -> Self {
        Self::new(vec![
            Box::new(LiveVersionPointer::new(store, default_entrypoint)),
            Box::new(LegacyMarker::new(objects)),
            Box::new(ProjectBasePath::new(default_entrypoint)),
        ])
    }

    pub async fn resolve(&self, project: &Project) -> DeliveryResult<Option<ResolvedVersion>> {
        for strategy in &self.strategies {
            if let Some(resolved) = strategy.resolve(project).await? {
                debug!(
                    project_id = %project.id,
                    tier = ?resolved.source,
                    storage_prefix = %resolved.storage_prefix,
                    entrypoint = %resolved.entrypoint,
                    "Resolved version"
                );
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }
}

// ------------------------------------------------------------------
// Tier 1: live version pointer
// ------------------------------------------------------------------

pub struct LiveVersionPointer {
    store: Arc<dyn ProjectStore>,
    default_entrypoint: String,
}

impl LiveVersionPointer {
    pub fn new(store: Arc<dyn ProjectStore>, default_entrypoint: &str) -> Self {
        Self {
            store,
            default_entrypoint: default_entrypoint.to_string(),
        }
    }
}

#[async_trait]
impl VersionStrategy for LiveVersionPointer {
    async fn resolve(&self, project: &Project) -> DeliveryResult<Option<ResolvedVersion>> {
        let Some(version_id) = project.live_version_id else {
            return Ok(None);
        };

        let Some(version) = self.store.version_by_id(version_id).await? else {
            warn!(project_id = %project.id, %version_id, "Live version record is missing");
            return Ok(None);
        };

        let prefix = version.storage_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            warn!(project_id = %project.id, %version_id, "Live version has an empty storage prefix");
            return Ok(None);
        }

        let entrypoint = version
            .entrypoint
            .as_deref()
            .map(|e| e.trim_start_matches('/'))
            .filter(|e| !e.is_empty())
            .unwrap_or(self.default_entrypoint.as_str());

        Ok(Some(ResolvedVersion {
            storage_prefix: prefix.to_string(),
            entrypoint: entrypoint.to_string(),
            source: VersionSource::LivePointer,
        }))
    }
}

// ------------------------------------------------------------------
// Tier 2: legacy latest.json marker
// ------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MarkerDocument {
    path: String,
}

pub struct LegacyMarker {
    objects: Arc<dyn ObjectStore>,
}

impl LegacyMarker {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    pub fn marker_key(project: &Project) -> String {
        format!("{}/latest.json", project.base_path())
    }

    async fn read(&self, key: &str) -> Artifact<MarkerDocument> {
        match self.objects.get(key).await {
            Ok(bytes) => Artifact::from_json(bytes.as_deref()),
            Err(e) => Artifact::Malformed(format!("read failed: {e:#}")),
        }
    }
}

/// Split a marker path into `(prefix, entrypoint)` at the last separator.
fn split_marker_path(path: &str) -> Option<(&str, &str)> {
    let path = path.trim().trim_start_matches('/');
    let (prefix, file) = path.rsplit_once('/')?;
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() || file.is_empty() {
        return None;
    }
    Some((prefix, file))
}

#[async_trait]
impl VersionStrategy for LegacyMarker {
    async fn resolve(&self, project: &Project) -> DeliveryResult<Option<ResolvedVersion>> {
        let key = Self::marker_key(project);

        let marker = match self.read(&key).await {
            Artifact::Present(marker) => marker,
            Artifact::Absent => return Ok(None),
            Artifact::Malformed(reason) => {
                warn!(key, reason, "Ignoring unusable legacy marker");
                return Ok(None);
            }
        };

        let Some((prefix, entrypoint)) = split_marker_path(&marker.path) else {
            warn!(key, path = %marker.path, "Legacy marker path has no directory");
            return Ok(None);
        };

        Ok(Some(ResolvedVersion {
            storage_prefix: prefix.to_string(),
            entrypoint: entrypoint.to_string(),
            source: VersionSource::LegacyMarker,
        }))
    }
}

// ------------------------------------------------------------------
// Tier 3: project base path
// ------------------------------------------------------------------

pub struct ProjectBasePath {
    default_entrypoint: String,
}

impl ProjectBasePath {
    pub fn new(default_entrypoint: &str) -> Self {
        Self {
            default_entrypoint: default_entrypoint.to_string(),
        }
    }
}

#[async_trait]
impl VersionStrategy for ProjectBasePath {
    async fn resolve(&self, project: &Project) -> DeliveryResult<Option<ResolvedVersion>> {
        Ok(Some(ResolvedVersion {
            storage_prefix: project.base_path(),
            entrypoint: self.default_entrypoint.clone(),
            source: VersionSource::BasePath,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryObjectStore, MemoryProjectStore, project, version};
    use arcade_common::models::ProjectStatus;

    fn standard(store: MemoryProjectStore, objects: Arc<MemoryObjectStore>) -> VersionResolver {
        VersionResolver::standard(Arc::new(store), objects, "index.html")
    }

    #[tokio::test]
    async fn test_live_pointer_wins_and_marker_is_never_read() {
        let mut p = project(Some("g"), ProjectStatus::Published);
        let v = version(&p, "builds/v7/", Some("play.html"));
        p.live_version_id = Some(v.id);

        let marker = LegacyMarker::marker_key(&p);
        let objects = Arc::new(
            MemoryObjectStore::default().with(marker.clone(), r#"{"path":"old/index.html"}"#),
        );
        let resolver = standard(
            MemoryProjectStore {
                versions: vec![v],
                ..Default::default()
            },
            objects.clone(),
        );

        let resolved = resolver.resolve(&p).await.unwrap().unwrap();
        assert_eq!(resolved.storage_prefix, "builds/v7");
        assert_eq!(resolved.entrypoint, "play.html");
        assert_eq!(resolved.source, VersionSource::LivePointer);
        assert_eq!(objects.read_count(&marker), 0);
    }

    #[tokio::test]
    async fn test_live_pointer_defaults_entrypoint() {
        let mut p = project(None, ProjectStatus::Published);
        let v = version(&p, "builds/v1", None);
        p.live_version_id = Some(v.id);

        let resolver = standard(
            MemoryProjectStore {
                versions: vec![v],
                ..Default::default()
            },
            Arc::new(MemoryObjectStore::default()),
        );

        let resolved = resolver.resolve(&p).await.unwrap().unwrap();
        assert_eq!(resolved.entrypoint, "index.html");
    }

    #[tokio::test]
    async fn test_legacy_marker_derives_parent_directory_and_entrypoint() {
        let p = project(None, ProjectStatus::Published);
        let objects = Arc::new(MemoryObjectStore::default().with(
            LegacyMarker::marker_key(&p),
            r#"{"path":"builds/v3/game.html"}"#,
        ));
        let resolver = standard(MemoryProjectStore::default(), objects);

        let resolved = resolver.resolve(&p).await.unwrap().unwrap();
        assert_eq!(resolved.storage_prefix, "builds/v3");
        assert_eq!(resolved.entrypoint, "game.html");
        assert_eq!(resolved.source, VersionSource::LegacyMarker);
    }

    #[tokio::test]
    async fn test_empty_prefix_on_live_version_falls_to_marker() {
        let mut p = project(None, ProjectStatus::Published);
        let v = version(&p, "/", None);
        p.live_version_id = Some(v.id);
        let objects = Arc::new(MemoryObjectStore::default().with(
            LegacyMarker::marker_key(&p),
            r#"{"path":"legacy/build/index.html"}"#,
        ));
        let resolver = standard(
            MemoryProjectStore {
                versions: vec![v],
                ..Default::default()
            },
            objects,
        );

        let resolved = resolver.resolve(&p).await.unwrap().unwrap();
        assert_eq!(resolved.storage_prefix, "legacy/build");
        assert_eq!(resolved.source, VersionSource::LegacyMarker);
    }

    #[tokio::test]
    async fn test_malformed_or_failing_marker_degrades_to_base_path() {
        let p = project(None, ProjectStatus::Published);
        let key = LegacyMarker::marker_key(&p);

        for objects in [
            MemoryObjectStore::default().with(key.clone(), "{oops"),
            MemoryObjectStore::default().with(key.clone(), r#"{"path":"index.html"}"#),
            MemoryObjectStore::default().failing(key.clone()),
            MemoryObjectStore::default(),
        ] {
            let resolver = standard(MemoryProjectStore::default(), Arc::new(objects));
            let resolved = resolver.resolve(&p).await.unwrap().unwrap();
            assert_eq!(resolved.storage_prefix, p.base_path());
            assert_eq!(resolved.entrypoint, "index.html");
            assert_eq!(resolved.source, VersionSource::BasePath);
        }
    }

    #[tokio::test]
    async fn test_version_lookup_failure_is_fatal() {
        let mut p = project(None, ProjectStatus::Published);
        p.live_version_id = Some(uuid::Uuid::now_v7());
        let resolver = standard(
            MemoryProjectStore {
                fail_versions: true,
                ..Default::default()
            },
            Arc::new(MemoryObjectStore::default()),
        );

        let err = resolver.resolve(&p).await.unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_empty_strategy_list_resolves_nothing() {
        let p = project(None, ProjectStatus::Published);
        assert_eq!(VersionResolver::new(vec![]).resolve(&p).await.unwrap(), None);
    }

    #[test]
    fn test_split_marker_path() {
        assert_eq!(
            split_marker_path("a/b/c/index.html"),
            Some(("a/b/c", "index.html"))
        );
        assert_eq!(split_marker_path("/x/y.html"), Some(("x", "y.html")));
        assert_eq!(split_marker_path("index.html"), None);
        assert_eq!(split_marker_path("dir/"), None);
    }
}
