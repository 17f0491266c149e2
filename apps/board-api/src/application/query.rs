use axum::{
    Json,
    extract::{Extension, Path, State},
};
use core_lib::domain::{idea::Idea, tenant::Tenant};
use serde_json::{Value, json};
use tracing::debug;

use crate::AppState;
use crate::application::ApplicationError;
use crate::application::middleware::{AuthenticatedUser, CurrentTenant, CurrentUser, RequestLocale};

// GET /api/ideas
pub async fn handle_list_ideas(
    State(app_state): State<AppState>,
    Extension(CurrentTenant(tenant)): Extension<CurrentTenant>,
    Extension(RequestLocale(locale)): Extension<RequestLocale>,
) -> Result<Json<Value>, ApplicationError> {
    let ideas = app_state.ideas.list_ideas(tenant.id).await?;
    debug!("Listing {} ideas of tenant {}", ideas.len(), tenant.id);

    let summary = app_state
        .locales
        .translate_with(Some(locale), "ideas.summary", &json!({ "count": ideas.len() }))?;
    Ok(Json(json!({ "summary": summary, "ideas": ideas })))
}

// GET /api/ideas/{number}
pub async fn handle_get_idea_by_number(
    State(app_state): State<AppState>,
    Extension(CurrentTenant(tenant)): Extension<CurrentTenant>,
    Path(number): Path<i32>,
) -> Result<Json<Idea>, ApplicationError> {
    let idea = app_state.ideas.get_idea_by_number(tenant.id, number).await?;
    Ok(Json(idea))
}

// GET /api/ideas/id/{id}
pub async fn handle_get_idea(
    State(app_state): State<AppState>,
    Extension(CurrentTenant(tenant)): Extension<CurrentTenant>,
    Path(idea_id): Path<i32>,
) -> Result<Json<Idea>, ApplicationError> {
    let idea = app_state.ideas.get_idea(tenant.id, idea_id).await?;
    Ok(Json(idea))
}

// GET /api/ideas/{number}/comments
pub async fn handle_list_comments(
    State(app_state): State<AppState>,
    Extension(CurrentTenant(tenant)): Extension<CurrentTenant>,
    Extension(RequestLocale(locale)): Extension<RequestLocale>,
    Path(number): Path<i32>,
) -> Result<Json<Value>, ApplicationError> {
    let idea = app_state.ideas.get_idea_by_number(tenant.id, number).await?;
    let comments = app_state.ideas.list_comments(tenant.id, idea.id).await?;

    let summary = app_state
        .locales
        .translate_with(Some(locale), "comments.summary", &json!({ "count": comments.len() }))?;
    Ok(Json(json!({ "summary": summary, "comments": comments })))
}

// GET /api/admin/tenant
pub async fn handle_get_tenant(Extension(CurrentTenant(tenant)): Extension<CurrentTenant>) -> Json<Tenant> {
    Json(tenant)
}

// GET /auth/session
pub async fn handle_get_session(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(RequestLocale(locale)): Extension<RequestLocale>,
) -> Result<Json<Value>, ApplicationError> {
    let greeting = app_state.locales.translate_with(
        Some(locale),
        "session.greeting",
        &json!({ "role": user.role, "name": user.name }),
    )?;
    Ok(Json(json!({ "user": session_view(&user), "greeting": greeting })))
}

fn session_view(user: &AuthenticatedUser) -> Value {
    json!({
        "id": user.user_id,
        "tenantId": user.tenant_id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    })
}
