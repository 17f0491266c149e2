use async_trait::async_trait;
use std::error::Error as StdError;

// Declare modules
pub mod adapters;
pub mod domain;

use domain::idea::{Comment, Idea};
use domain::tenant::Tenant;

// Define a common error type for the core library
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] Box<dyn StdError + Send + Sync>),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wraps any driver-level error (sqlx, cache backend) as an infrastructure failure.
    pub fn infrastructure<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        CoreError::Infrastructure(Box::new(err))
    }
}

impl From<domain::user::RoleParseError> for CoreError {
    fn from(err: domain::user::RoleParseError) -> Self {
        CoreError::Deserialization(err.to_string())
    }
}

/// Tenant-scoped read and write operations over ideas and their comments.
///
/// Every read takes the tenant id and must never return rows of another tenant.
/// Writes run inside a single transaction that is either committed or rolled back.
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// All ideas of a tenant, newest first.
    async fn list_ideas(&self, tenant_id: i32) -> Result<Vec<Idea>, CoreError>;

    /// Fails with `CoreError::NotFound` when no idea matches tenant and id.
    async fn get_idea(&self, tenant_id: i32, idea_id: i32) -> Result<Idea, CoreError>;

    /// Fails with `CoreError::NotFound` when no idea matches tenant and number.
    async fn get_idea_by_number(&self, tenant_id: i32, number: i32) -> Result<Idea, CoreError>;

    /// Comments of an idea that belongs to the tenant, newest first.
    async fn list_comments(&self, tenant_id: i32, idea_id: i32) -> Result<Vec<Comment>, CoreError>;

    /// Inserts an idea numbered `max(number) + 1` within the tenant.
    async fn create_idea(
        &self,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> Result<Idea, CoreError>;

    /// Inserts a comment and returns its id.
    async fn add_comment(&self, user_id: i32, idea_id: i32, content: &str) -> Result<i32, CoreError>;
}

// Port for resolving the tenant a request is addressed to
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn get_by_subdomain(&self, subdomain: &str) -> Result<Tenant, CoreError>;
    async fn get_by_cname(&self, cname: &str) -> Result<Tenant, CoreError>;
}

// Port for caching data
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError>;
    async fn set(&self, key: &str, value: &[u8], ttl_seconds: Option<u64>)
        -> Result<(), CoreError>;
    async fn delete(&self, key: &str) -> Result<(), CoreError>;
}
