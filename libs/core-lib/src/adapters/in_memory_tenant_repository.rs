use crate::domain::tenant::Tenant;
use crate::{CoreError, TenantRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory implementation of the TenantRepository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantRepository {
    // Tenant ID -> Tenant
    tenants: Arc<DashMap<i32, Tenant>>,
}

impl InMemoryTenantRepository {
    pub fn add(&self, tenant: Tenant) {
        self.tenants.insert(tenant.id, tenant);
    }

    fn find(&self, predicate: impl Fn(&Tenant) -> bool) -> Option<Tenant> {
        self.tenants
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn get_by_subdomain(&self, subdomain: &str) -> Result<Tenant, CoreError> {
        self.find(|t| t.subdomain == subdomain)
            .ok_or_else(|| CoreError::NotFound(format!("tenant with subdomain '{subdomain}'")))
    }

    async fn get_by_cname(&self, cname: &str) -> Result<Tenant, CoreError> {
        if cname.is_empty() {
            return Err(CoreError::NotFound("tenant with empty cname".into()));
        }
        self.find(|t| t.cname == cname)
            .ok_or_else(|| CoreError::NotFound(format!("tenant with cname '{cname}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_by_subdomain_and_cname() {
        let repo = InMemoryTenantRepository::default();
        repo.add(Tenant {
            id: 1,
            name: "Demonstration".to_string(),
            subdomain: "demo".to_string(),
            cname: "feedback.demo.org".to_string(),
            ..Default::default()
        });
        repo.add(Tenant {
            id: 2,
            subdomain: "orange".to_string(),
            ..Default::default()
        });

        assert_eq!(repo.get_by_subdomain("demo").await.unwrap().id, 1);
        assert_eq!(repo.get_by_cname("feedback.demo.org").await.unwrap().id, 1);
        assert!(matches!(
            repo.get_by_subdomain("apple").await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(repo.get_by_cname("").await, Err(CoreError::NotFound(_))));
    }
}
