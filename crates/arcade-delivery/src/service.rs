//! The delivery pipeline: request → project → version → manifest → file → response.

use std::sync::Arc;

use arcade_common::{
    artifact::Artifact,
    config::DeliveryConfig,
    error::{DeliveryError, DeliveryResult},
    models::{Manifest, Project},
};
use axum::response::Response;
use tracing::{debug, warn};

use crate::{
    fetcher::{FileFetcher, fetch_with_fallback},
    manifest::{self, ManifestLoader},
    path,
    resolver::{ProjectResolver, VersionResolver},
    response::ResponseComposer,
    store::{ObjectStore, ProjectStore},
};

/// What an inbound request asks for.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryRequest<'a> {
    pub host: Option<&'a str>,
    /// Request path without the leading `/`; `None` for the root.
    pub path: Option<&'a str>,
}

pub struct DeliveryService {
    /// First path segment of `/{mount}/{identifier}/{file}` URLs.
    mount: String,
    projects: ProjectResolver,
    versions: VersionResolver,
    manifests: ManifestLoader,
    fetcher: FileFetcher,
    composer: ResponseComposer,
}

impl DeliveryService {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        objects: Arc<dyn ObjectStore>,
        config: &DeliveryConfig,
    ) -> Self {
        Self {
            mount: config.mount.trim_matches('/').to_string(),
            projects: ProjectResolver::new(store.clone()),
            versions: VersionResolver::standard(store, objects.clone(), &config.default_entrypoint),
            manifests: ManifestLoader::new(objects.clone()),
            fetcher: FileFetcher::new(objects),
            composer: ResponseComposer::new(config.inject_router_patch),
        }
    }

    /// Swap the version tiers (the standard list is live pointer → marker → base path).
    pub fn with_version_resolver(mut self, versions: VersionResolver) -> Self {
        self.versions = versions;
        self
    }

    pub async fn deliver(&self, request: DeliveryRequest<'_>) -> DeliveryResult<Response> {
        let request_path = path::file_path(request.path)?;
        let (project, file) = self.locate(request.host, request_path).await?;

        let Some(version) = self.versions.resolve(&project).await? else {
            debug!(project_id = %project.id, "No version tier resolved");
            return Err(DeliveryError::FileNotFound);
        };

        let manifest = match self.manifests.load(&version.storage_prefix).await {
            Artifact::Present(manifest) => Some(manifest),
            Artifact::Absent => None,
            Artifact::Malformed(reason) => {
                warn!(storage_prefix = %version.storage_prefix, reason, "Ignoring unusable manifest");
                None
            }
        };

        let entrypoint = effective_entrypoint(manifest.as_ref(), &version.entrypoint);
        let requested = file.as_deref().unwrap_or(entrypoint);
        let requested = manifest::gate(manifest.as_ref(), requested, entrypoint);

        let fetched = fetch_with_fallback(&self.fetcher, &version.storage_prefix, requested, entrypoint)
            .await?
            .ok_or(DeliveryError::FileNotFound)?;

        debug!(
            project_id = %project.id,
            storage_prefix = %version.storage_prefix,
            file = %fetched.path,
            fell_back = fetched.fell_back,
            "Serving file"
        );

        Ok(self
            .composer
            .compose(&fetched.path, fetched.bytes, manifest.as_ref()))
    }

    /// The project a request addresses, and the file path inside it.
    ///
    /// A mapped host owns its whole path space, so `/{mount}/...` on a custom
    /// domain is an ordinary file path. Elsewhere the path must sit under the
    /// mount prefix and name a project.
    async fn locate(
        &self,
        host: Option<&str>,
        request_path: Option<String>,
    ) -> DeliveryResult<(Project, Option<String>)> {
        if let Some(project) = self.projects.by_host(host).await {
            return Ok((project, request_path));
        }

        let (identifier, file) = request_path
            .as_deref()
            .and_then(|p| path::mounted(&self.mount, p))
            .ok_or(DeliveryError::ProjectNotFound)?;
        let identifier = path::identifier(identifier)?;

        let project = self
            .projects
            .by_identifier(identifier)
            .await
            .ok_or(DeliveryError::ProjectNotFound)?;
        Ok((project, file.map(str::to_string)))
    }
}

/// Manifest entrypoint wins over the version's declared one.
pub fn effective_entrypoint<'a>(manifest: Option<&'a Manifest>, version_entrypoint: &'a str) -> &'a str {
    manifest
        .and_then(|m| m.entrypoint.as_deref())
        .unwrap_or(version_entrypoint)
}
