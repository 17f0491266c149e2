use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use core_lib::domain::user::Role;
use std::sync::Arc;
use tracing::debug;

use super::middleware::CurrentUser;

/// Roles allowed through `is_authorized`; membership only, roles are not ranked.
#[derive(Clone, Debug)]
pub struct AllowedRoles(Arc<[Role]>);

impl AllowedRoles {
    pub fn new(roles: &[Role]) -> Self {
        Self(Arc::from(roles))
    }

    pub fn allows(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// Rejects with `403 Forbidden` unless the current user holds an allowed role.
pub async fn is_authorized(
    State(allowed): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|CurrentUser(user)| (user.user_id, user.role));
    match user {
        Some((_, role)) if allowed.allows(role) => Ok(next.run(req).await),
        Some((user_id, role)) => {
            debug!("User {} with role {} is not allowed", user_id, role);
            Err(StatusCode::FORBIDDEN)
        }
        None => Err(StatusCode::FORBIDDEN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_roles_is_set_membership() {
        let allowed = AllowedRoles::new(&[Role::Administrator, Role::Member]);
        assert!(allowed.allows(Role::Administrator));
        assert!(allowed.allows(Role::Member));
        // Collaborator outranks Member but is not in the set
        assert!(!allowed.allows(Role::Collaborator));
        assert!(!allowed.allows(Role::Visitor));
        assert!(!AllowedRoles::new(&[]).allows(Role::Administrator));
    }
}
