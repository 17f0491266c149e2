pub mod auth;
pub mod host;
pub mod locale;
pub mod tenant;

pub use auth::{AuthenticatedUser, CurrentUser, attach_user, is_authenticated, save_session};
pub use host::{ExpectedHost, host_checker};
pub use locale::{RequestLocale, resolve_locale};
pub use tenant::{CurrentTenant, guard_private_tenant, resolve_tenant};
