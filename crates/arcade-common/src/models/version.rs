//! Version model: an immutable published build at a fixed storage prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Version {
    pub id: Uuid,
    pub project_id: Uuid,

    /// Directory-like key namespace holding the build's files.
    pub storage_prefix: String,

    /// Declared entrypoint file name (`index.html` when unset).
    pub entrypoint: Option<String>,

    pub created_at: DateTime<Utc>,
}
