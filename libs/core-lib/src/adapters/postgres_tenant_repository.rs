use crate::domain::tenant::{Tenant, TenantStatus};
use crate::{CoreError, TenantRepository};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(sqlx::FromRow, Debug)]
struct TenantRow {
    id: i32,
    name: String,
    subdomain: String,
    cname: String,
    invitation: String,
    welcome_message: String,
    status: i32,
    is_private: bool,
    logo_blob_key: String,
    custom_css: String,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = CoreError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        let status = TenantStatus::try_from(row.status).map_err(CoreError::Deserialization)?;
        Ok(Tenant {
            id: row.id,
            name: row.name,
            subdomain: row.subdomain,
            invitation: row.invitation,
            welcome_message: row.welcome_message,
            cname: row.cname,
            status,
            is_private: row.is_private,
            logo_blob_key: row.logo_blob_key,
            custom_css: row.custom_css,
        })
    }
}

/// PostgreSQL implementation of the TenantRepository port.
#[derive(Debug, Clone)]
pub struct PostgresTenantRepository {
    pool: PgPool,
}

impl PostgresTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by(&self, column: &str, value: &str) -> Result<Tenant, CoreError> {
        let query = format!(
            "SELECT id, name, subdomain, cname, invitation, welcome_message, status, is_private, logo_blob_key, custom_css
             FROM tenants
             WHERE {column} = $1"
        );
        let row: Option<TenantRow> = sqlx::query_as(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(CoreError::infrastructure)?;

        match row {
            Some(row) => Tenant::try_from(row),
            None => Err(CoreError::NotFound(format!("tenant with {column} '{value}'"))),
        }
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    async fn get_by_subdomain(&self, subdomain: &str) -> Result<Tenant, CoreError> {
        self.fetch_by("subdomain", subdomain).await
    }

    async fn get_by_cname(&self, cname: &str) -> Result<Tenant, CoreError> {
        if cname.is_empty() {
            return Err(CoreError::NotFound("tenant with empty cname".into()));
        }
        self.fetch_by("cname", cname).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::setup_db;

    #[tokio::test]
    async fn test_get_by_subdomain_and_cname() {
        let (pool, _node) = setup_db().await;
        let repo = PostgresTenantRepository::new(pool);

        let demo = repo.get_by_subdomain("demo").await.expect("demo tenant");
        assert_eq!(demo.id, 1);
        assert_eq!(demo.name, "Demonstration");
        assert!(!demo.is_private);

        let by_cname = repo.get_by_cname("feedback.demo.org").await.expect("cname lookup");
        assert_eq!(by_cname.id, 1);

        let orange = repo.get_by_subdomain("orange").await.expect("orange tenant");
        assert!(orange.is_private);
        assert_eq!(orange.status, TenantStatus::Active);
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_not_found() {
        let (pool, _node) = setup_db().await;
        let repo = PostgresTenantRepository::new(pool);

        assert!(matches!(
            repo.get_by_subdomain("unknown").await,
            Err(CoreError::NotFound(_))
        ));
        // Tenant 2 has an empty cname; an empty lookup must not match it
        assert!(matches!(repo.get_by_cname("").await, Err(CoreError::NotFound(_))));
    }
}
