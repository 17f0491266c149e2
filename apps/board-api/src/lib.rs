use axum::{
    Json, Router,
    middleware::{self},
    response::IntoResponse,
    routing::{get, post},
};
use http::StatusCode;
use core_lib::{Cache, CoreError, IdeaRepository, TenantRepository, domain::user::Role};
use i18n::LocaleStore;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

pub mod application;
pub mod config;

use application::{
    authz::{AllowedRoles, is_authorized},
    commands::{add_comment::handle_add_comment_request, create_idea::handle_create_idea_request},
    middleware::{
        ExpectedHost, attach_user, guard_private_tenant, host_checker, is_authenticated, resolve_locale,
        resolve_tenant,
    },
    query::{
        handle_get_idea, handle_get_idea_by_number, handle_get_session, handle_get_tenant, handle_list_comments,
        handle_list_ideas,
    },
};
use config::Config;

// Holds shared dependencies
#[derive(Clone)]
pub struct AppState {
    pub ideas: Arc<dyn IdeaRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub sessions: Arc<dyn Cache>,
    pub locales: Arc<LocaleStore>,
    pub config: Arc<Config>,
}

pub fn create_app(app_state: AppState) -> Router {
    let moderators = AllowedRoles::new(&[Role::Administrator, Role::Collaborator]);

    let api_routes = Router::new()
        .route(
            "/ideas",
            get(handle_list_ideas)
                .merge(post(handle_create_idea_request).route_layer(middleware::from_fn(is_authenticated))),
        )
        .route("/ideas/{number}", get(handle_get_idea_by_number))
        .route("/ideas/id/{id}", get(handle_get_idea))
        .route(
            "/ideas/{number}/comments",
            get(handle_list_comments)
                .merge(post(handle_add_comment_request).route_layer(middleware::from_fn(is_authenticated))),
        )
        .route(
            "/admin/tenant",
            get(handle_get_tenant)
                .route_layer(middleware::from_fn_with_state(moderators, is_authorized))
                .route_layer(middleware::from_fn(is_authenticated)),
        )
        // Innermost first: tenant, then user, then locale, then the privacy check
        .route_layer(middleware::from_fn_with_state(app_state.clone(), guard_private_tenant))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), resolve_locale))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), attach_user))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), resolve_tenant));

    let auth_routes = Router::new()
        .route("/session", get(handle_get_session))
        .route_layer(middleware::from_fn(is_authenticated))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), resolve_locale))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), attach_user))
        .route_layer(middleware::from_fn_with_state(
            ExpectedHost::new(&app_state.config.auth_endpoint),
            host_checker,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .nest("/auth", auth_routes)
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub fn map_core_error(err: &CoreError) -> StatusCode {
    let status = match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CoreError::Internal(_)
        | CoreError::Serialization(_)
        | CoreError::Deserialization(_)
        | CoreError::Infrastructure(_)
        | CoreError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("CoreError occurred: {:?}", err);
    } else {
        debug!("CoreError occurred: {:?}", err);
    }
    status
}
