//! Project resolution: which published project does this request address?
//!
//! Resolution order, first hit wins:
//!
//! 1. **Custom domain**: an active mapping for the request host
//! 2. **Slug**: the path identifier as a published slug
//! 3. **Id**: the path identifier as a project UUID
//!
//! The host is checked before the path is interpreted at all. On a mapped host
//! the whole path is a file path, so callers try [`ProjectResolver::by_host`]
//! first and only then split out an identifier for
//! [`ProjectResolver::by_identifier`].
//!
//! Unpublished records are indistinguishable from missing ones, and datastore
//! failures count as misses: resolution fails closed.

use std::sync::Arc;

use arcade_common::models::{Project, normalize_host};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::store::ProjectStore;

pub struct ProjectResolver {
    store: Arc<dyn ProjectStore>,
}

impl ProjectResolver {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// Project behind an active custom-domain mapping for `host`.
    ///
    /// A mapping's target version overrides the project's live pointer.
    pub async fn by_host(&self, host: Option<&str>) -> Option<Project> {
        self.by_domain(&normalize_host(host?)).await
    }

    /// Project addressed by a path identifier: published slug, then UUID.
    pub async fn by_identifier(&self, identifier: &str) -> Option<Project> {
        if let Some(project) = visible(
            "slug",
            identifier,
            self.store.project_by_slug(identifier).await,
        ) {
            return Some(project);
        }

        let id = Uuid::parse_str(identifier).ok()?;
        visible("id", identifier, self.store.project_by_id(id).await)
    }

    async fn by_domain(&self, host: &str) -> Option<Project> {
        if host.is_empty() {
            return None;
        }

        let mapping = match self.store.active_domain_mapping(host).await {
            Ok(Some(mapping)) => mapping,
            Ok(None) => return None,
            Err(e) => {
                warn!(host, error = %e, "Domain mapping lookup failed");
                return None;
            }
        };

        let lookup = self.store.project_by_id(mapping.project_id).await;
        let mut project = visible("domain", host, lookup)?;

        if let Some(target) = mapping.target_version_id {
            debug!(host, project_id = %project.id, %target, "Domain mapping pins version");
            project.live_version_id = Some(target);
        }

        Some(project)
    }
}

/// Keep only published projects; log and drop lookup failures.
fn visible(
    tier: &'static str,
    key: &str,
    lookup: Result<Option<Project>, sqlx::Error>,
) -> Option<Project> {
    match lookup {
        Ok(Some(project)) if project.is_published() => {
            debug!(tier, key, project_id = %project.id, "Resolved project");
            Some(project)
        }
        Ok(_) => None,
        Err(e) => {
            warn!(tier, key, error = %e, "Project lookup failed");
            None
        }
    }
}
