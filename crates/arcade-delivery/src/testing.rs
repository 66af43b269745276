//! In-memory stores for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use arcade_common::models::{DomainMapping, Project, ProjectStatus, Version};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::store::{ObjectStore, ProjectStore};

#[derive(Default)]
pub struct MemoryProjectStore {
    pub projects: Vec<Project>,
    pub mappings: Vec<DomainMapping>,
    pub versions: Vec<Version>,
    /// Make every project/mapping lookup fail.
    pub fail_lookups: bool,
    /// Make every version lookup fail.
    pub fail_versions: bool,
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn active_domain_mapping(&self, host: &str) -> Result<Option<DomainMapping>, sqlx::Error> {
        if self.fail_lookups {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self
            .mappings
            .iter()
            .find(|m| m.active && m.host == host)
            .cloned())
    }

    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        if self.fail_lookups {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self
            .projects
            .iter()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn project_by_id(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        if self.fail_lookups {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn version_by_id(&self, id: Uuid) -> Result<Option<Version>, sqlx::Error> {
        if self.fail_versions {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.versions.iter().find(|v| v.id == id).cloned())
    }

    async fn health_check(&self) -> bool {
        !self.fail_lookups
    }
}

/// Object store that records every key it is asked for.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: HashMap<String, Bytes>,
    failing: HashSet<String>,
    reads: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn with(mut self, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.objects.insert(key.into(), body.into());
        self
    }

    /// Reads of `key` fail with a transport-style error.
    pub fn failing(mut self, key: impl Into<String>) -> Self {
        self.failing.insert(key.into());
        self
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().expect("reads lock").clone()
    }

    pub fn read_count(&self, key: &str) -> usize {
        self.reads().iter().filter(|k| *k == key).count()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        self.reads.lock().expect("reads lock").push(key.to_string());
        if self.failing.contains(key) {
            anyhow::bail!("connection reset while reading {key}");
        }
        Ok(self.objects.get(key).cloned())
    }
}

pub fn project(slug: Option<&str>, status: ProjectStatus) -> Project {
    Project {
        id: Uuid::now_v7(),
        owner_id: Uuid::now_v7(),
        slug: slug.map(str::to_string),
        status,
        live_version_id: None,
        preview_version_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn version(project: &Project, storage_prefix: &str, entrypoint: Option<&str>) -> Version {
    Version {
        id: Uuid::now_v7(),
        project_id: project.id,
        storage_prefix: storage_prefix.to_string(),
        entrypoint: entrypoint.map(str::to_string),
        created_at: Utc::now(),
    }
}

pub fn mapping(host: &str, project: &Project, target_version_id: Option<Uuid>) -> DomainMapping {
    DomainMapping {
        host: host.to_string(),
        project_id: project.id,
        target_version_id,
        active: true,
        created_at: Utc::now(),
    }
}
