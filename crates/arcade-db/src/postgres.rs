//! PostgreSQL reachability for `/health`.

use std::time::Duration;

use sqlx::PgPool;

/// Upper bound on waiting for a pooled connection plus one round trip.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// `true` when a trivial query completes within [`HEALTH_TIMEOUT`].
///
/// A saturated pool reports unhealthy instead of stalling the health endpoint.
pub async fn health_check(pool: &PgPool) -> bool {
    let query = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool);

    match tokio::time::timeout(HEALTH_TIMEOUT, query).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
        Err(_) => {
            tracing::warn!(timeout = ?HEALTH_TIMEOUT, "Database health check timed out");
            false
        }
    }
}
