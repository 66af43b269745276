//! Project version repository.

use arcade_common::models::version::Version;
use sqlx::PgPool;
use uuid::Uuid;

/// Find a version record by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Version>, sqlx::Error> {
    sqlx::query_as::<_, Version>("SELECT * FROM project_versions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
