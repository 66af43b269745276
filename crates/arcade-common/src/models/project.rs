//! Project model: the publishable unit, and the custom-domain mappings that point at it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Published,
}

/// A user's publishable game/app.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,

    /// Owning account; also the first segment of the project's storage base path.
    pub owner_id: Uuid,

    /// Human-readable identifier, unique among published projects only.
    pub slug: Option<String>,

    pub status: ProjectStatus,

    /// Version currently served to the public.
    pub live_version_id: Option<Uuid>,

    pub preview_version_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }

    /// Storage namespace holding every artifact ever written for this project.
    pub fn base_path(&self) -> String {
        format!("{}/{}", self.owner_id, self.id)
    }
}

/// Binding from an externally owned host name to a project.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DomainMapping {
    /// Lower-cased host without port.
    pub host: String,
    pub project_id: Uuid,
    /// Serve this version on the host instead of the project's live version.
    pub target_version_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Normalize a `Host` header value for mapping lookups.
///
/// Lower-cases, strips the port and a trailing dot. IPv6 literals keep their brackets.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}
