use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use core_lib::{
    Cache, CoreError,
    domain::user::{Role, User, UserStatus},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::tenant::CurrentTenant;
use crate::AppState;

/// Session payload stored in the cache under the session token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
}

impl AuthenticatedUser {
    pub fn new(tenant_id: i32, user: &User) -> Self {
        Self {
            user_id: user.id,
            tenant_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

/// The signed-in user of the current request.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthenticatedUser);

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

/// Stores a session so that `token` authenticates as `user`.
pub async fn save_session(
    cache: &dyn Cache,
    token: &str,
    user: &AuthenticatedUser,
    ttl_seconds: Option<u64>,
) -> Result<(), CoreError> {
    let bytes = serde_json::to_vec(user).map_err(|e| CoreError::Serialization(e.to_string()))?;
    cache.set(&session_key(token), &bytes, ttl_seconds).await
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Attaches `CurrentUser` when the request carries a valid session token.
///
/// Unknown, expired or foreign-tenant sessions leave the request anonymous.
pub async fn attach_user(State(app_state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(&req) else {
        return next.run(req).await;
    };

    let session = match app_state.sessions.get(&session_key(token)).await {
        Ok(Some(bytes)) => match serde_json::from_slice::<AuthenticatedUser>(&bytes) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Failed to deserialize cached session: {}", e);
                None
            }
        },
        Ok(None) => {
            debug!("Session token not found in cache");
            None
        }
        Err(e) => {
            warn!("Cache error during session lookup: {}", e);
            None
        }
    };

    if let Some(user) = session {
        let tenant_id = req
            .extensions()
            .get::<CurrentTenant>()
            .map(|CurrentTenant(tenant)| tenant.id);
        match tenant_id {
            Some(id) if id != user.tenant_id => {
                warn!("Session of user {} used on tenant {}", user.user_id, id);
            }
            _ if user.status != UserStatus::Active => {
                debug!("Ignoring session of inactive user {}", user.user_id);
            }
            _ => {
                req.extensions_mut().insert(CurrentUser(user));
            }
        }
    }

    next.run(req).await
}

/// Rejects anonymous requests with `403 Forbidden`.
pub async fn is_authenticated(req: Request, next: Next) -> Result<Response, StatusCode> {
    if req.extensions().get::<CurrentUser>().is_none() {
        debug!("Rejecting anonymous request to {}", req.uri().path());
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}
