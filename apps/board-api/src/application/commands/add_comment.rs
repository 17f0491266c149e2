use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::application::ApplicationError;
use crate::application::middleware::{CurrentTenant, CurrentUser, RequestLocale};

#[derive(Deserialize, Debug)]
pub struct AddCommentDto {
    #[serde(default)]
    pub content: String,
}

// POST /api/ideas/{number}/comments
pub async fn handle_add_comment_request(
    State(app_state): State<AppState>,
    Extension(CurrentTenant(tenant)): Extension<CurrentTenant>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(RequestLocale(locale)): Extension<RequestLocale>,
    Path(number): Path<i32>,
    Json(payload): Json<AddCommentDto>,
) -> Result<(StatusCode, Json<Value>), ApplicationError> {
    let content = payload.content.trim();
    if content.is_empty() {
        let message = app_state
            .locales
            .translate(Some(locale), "validation.comment.required")?;
        return Err(ApplicationError::validation(message));
    }

    // add_comment is keyed by idea id only; the lookup scopes it to the tenant
    let idea = app_state.ideas.get_idea_by_number(tenant.id, number).await?;
    let comment_id = app_state
        .ideas
        .add_comment(user.user_id, idea.id, content)
        .await?;
    info!("Comment {} added to idea #{} on tenant {}", comment_id, idea.number, tenant.id);

    Ok((StatusCode::CREATED, Json(json!({ "id": comment_id }))))
}
