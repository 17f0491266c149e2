use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_lib::{CoreError, domain::tenant::Tenant};
use serde_json::json;
use tracing::{debug, error, warn};

use super::auth::CurrentUser;
use super::host::request_host;
use super::locale::RequestLocale;
use crate::AppState;

/// The tenant the request is addressed to.
#[derive(Clone, Debug)]
pub struct CurrentTenant(pub Tenant);

/// How a host name identifies a tenant.
#[derive(Debug, PartialEq, Eq)]
pub enum TenantHost<'a> {
    Subdomain(&'a str),
    Cname(&'a str),
}

/// `demo.test.example.com` is the subdomain `demo`; any other host is a CNAME.
pub fn parse_tenant_host<'a>(host: &'a str, host_domain: &str) -> TenantHost<'a> {
    let host = host.split(':').next().unwrap_or(host);
    match host.strip_suffix(host_domain).and_then(|rest| rest.strip_suffix('.')) {
        Some(subdomain) if !subdomain.is_empty() && !subdomain.contains('.') => {
            TenantHost::Subdomain(subdomain)
        }
        _ => TenantHost::Cname(host),
    }
}

/// Resolves the tenant from the host and inserts `CurrentTenant`.
///
/// Unknown hosts and tenants that are not active get `404 Not Found`.
pub async fn resolve_tenant(
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let host = request_host(&req).unwrap_or_default().to_ascii_lowercase();
    let lookup = match parse_tenant_host(&host, &app_state.config.host_domain) {
        TenantHost::Subdomain(subdomain) => app_state.tenants.get_by_subdomain(subdomain).await,
        TenantHost::Cname(cname) => app_state.tenants.get_by_cname(cname).await,
    };

    match lookup {
        Ok(tenant) if !tenant.is_active() => {
            warn!("Tenant {} is {:?}, refusing host '{}'", tenant.id, tenant.status, host);
            Err(StatusCode::NOT_FOUND)
        }
        Ok(tenant) => {
            debug!("Request for tenant {} ({})", tenant.id, tenant.subdomain);
            req.extensions_mut().insert(CurrentTenant(tenant));
            Ok(next.run(req).await)
        }
        Err(CoreError::NotFound(_)) => {
            warn!("No tenant for host '{}'", host);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!("Tenant lookup failed for host '{}': {}", host, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Private tenants only serve signed-in users.
pub async fn guard_private_tenant(State(app_state): State<AppState>, req: Request, next: Next) -> Response {
    let is_private = req
        .extensions()
        .get::<CurrentTenant>()
        .is_some_and(|CurrentTenant(tenant)| tenant.is_private);
    if !is_private || req.extensions().get::<CurrentUser>().is_some() {
        return next.run(req).await;
    }

    let locale = req
        .extensions()
        .get::<RequestLocale>()
        .map(|RequestLocale(locale)| *locale);
    let message = match app_state.locales.translate(locale, "error.privatesite") {
        Ok(message) => message,
        Err(e) => {
            error!("Failed to translate private site message: {}", e);
            String::new()
        }
    };
    (StatusCode::FORBIDDEN, Json(json!({ "message": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tenant_host() {
        let domain = "test.example.com";
        assert_eq!(parse_tenant_host("demo.test.example.com", domain), TenantHost::Subdomain("demo"));
        assert_eq!(
            parse_tenant_host("demo.test.example.com:3000", domain),
            TenantHost::Subdomain("demo")
        );
        assert_eq!(parse_tenant_host("feedback.demo.org", domain), TenantHost::Cname("feedback.demo.org"));
        assert_eq!(parse_tenant_host("test.example.com", domain), TenantHost::Cname("test.example.com"));
        assert_eq!(
            parse_tenant_host("a.b.test.example.com", domain),
            TenantHost::Cname("a.b.test.example.com")
        );
        assert_eq!(parse_tenant_host("demotest.example.com", domain), TenantHost::Cname("demotest.example.com"));
    }
}
