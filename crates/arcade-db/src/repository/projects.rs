//! Project repository — lookups used by public delivery.
//!
//! Every query here filters on `status = 'published'`; drafts are invisible
//! to the public read path.

use arcade_common::models::project::Project;
use sqlx::PgPool;
use uuid::Uuid;

/// Find a published project by its slug.
pub async fn find_published_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE slug = $1 AND status = 'published'",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Find a published project by its ID.
pub async fn find_published_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND status = 'published'")
        .bind(id)
        .fetch_optional(pool)
        .await
}
