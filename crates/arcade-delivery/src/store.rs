//! Backend seams for the delivery pipeline.
//!
//! The pipeline only reads: project records from the datastore and objects
//! from storage. Both sit behind traits so the resolvers can run against
//! PostgreSQL/S3 in production and in-memory stores in tests.

use arcade_common::models::{DomainMapping, Project, Version};
use arcade_db::{Database, repository, storage::StorageClient};
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

/// Read access to project metadata.
///
/// Lookups may return records in any publication status; callers decide
/// what is visible.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn active_domain_mapping(&self, host: &str) -> Result<Option<DomainMapping>, sqlx::Error>;

    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, sqlx::Error>;

    async fn project_by_id(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error>;

    async fn version_by_id(&self, id: Uuid) -> Result<Option<Version>, sqlx::Error>;

    async fn health_check(&self) -> bool;
}

/// Read access to object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when the object does not exist; `Err` for any other failure.
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>>;
}

#[async_trait]
impl ProjectStore for Database {
    async fn active_domain_mapping(&self, host: &str) -> Result<Option<DomainMapping>, sqlx::Error> {
        repository::domains::find_active_by_host(&self.pg, host).await
    }

    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        repository::projects::find_published_by_slug(&self.pg, slug).await
    }

    async fn project_by_id(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        repository::projects::find_published_by_id(&self.pg, id).await
    }

    async fn version_by_id(&self, id: Uuid) -> Result<Option<Version>, sqlx::Error> {
        repository::versions::find_by_id(&self.pg, id).await
    }

    async fn health_check(&self) -> bool {
        arcade_db::postgres::health_check(&self.pg).await
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        self.get_object(key).await
    }
}
