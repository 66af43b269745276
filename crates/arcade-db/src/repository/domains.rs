//! Custom-domain mapping repository.

use arcade_common::models::project::DomainMapping;
use sqlx::PgPool;

/// Find the active mapping for a normalized host.
pub async fn find_active_by_host(
    pool: &PgPool,
    host: &str,
) -> Result<Option<DomainMapping>, sqlx::Error> {
    sqlx::query_as::<_, DomainMapping>(
        "SELECT * FROM domain_mappings WHERE host = $1 AND active = TRUE",
    )
    .bind(host)
    .fetch_optional(pool)
    .await
}
