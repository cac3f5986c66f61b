//! Profile persistence
//!
//! The store owns the email uniqueness rule: `insert` returns `None` instead
//! of creating a second profile for an email that is already registered.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{CreateProfile, Profile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Atomically insert; `Ok(None)` when the email already exists.
    async fn insert(&self, data: CreateProfile) -> Result<Option<Profile>, StoreError>;
}

/// PostgreSQL-backed store (`profiles.email` is UNIQUE)
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        Ok(Profile::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(Profile::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, data: CreateProfile) -> Result<Option<Profile>, StoreError> {
        Ok(Profile::insert(&self.pool, &data).await?)
    }
}

/// Process-local store, used with `PROFILE_STORE=memory`
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn insert(&self, data: CreateProfile) -> Result<Option<Profile>, StoreError> {
        // Check and insert under one write lock
        let mut profiles = self.profiles.write().await;
        if profiles.values().any(|p| p.email == data.email) {
            return Ok(None);
        }

        let profile = Profile::from_new(data);
        profiles.insert(profile.id, profile.clone());
        Ok(Some(profile))
    }
}
