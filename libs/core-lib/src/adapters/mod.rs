// Declare modules within the adapters directory
pub mod in_memory_cache;
pub mod in_memory_idea_repository;
pub mod in_memory_tenant_repository;
pub mod postgres_idea_repository;
pub mod postgres_tenant_repository;

#[cfg(test)]
pub(crate) mod test_support;

/// Schema migrations for the Postgres adapters, embedded at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use in_memory_cache::InMemoryCache;
pub use in_memory_idea_repository::InMemoryIdeaRepository;
pub use in_memory_tenant_repository::InMemoryTenantRepository;
pub use postgres_idea_repository::PostgresIdeaRepository;
pub use postgres_tenant_repository::PostgresTenantRepository;
