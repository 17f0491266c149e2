use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::application::ApplicationError;
use crate::application::middleware::{CurrentTenant, CurrentUser, RequestLocale};

const MIN_TITLE_LENGTH: usize = 10;
// Matches the `ideas.title` column width
const MAX_TITLE_LENGTH: usize = 100;

#[derive(Deserialize, Debug)]
pub struct CreateIdeaDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CreateIdeaDto {
    /// Catalog key of the first failed rule, if any.
    pub fn validate(&self) -> Option<&'static str> {
        let title = self.title.trim();
        let length = title.chars().count();
        if title.is_empty() {
            Some("validation.title.required")
        } else if length < MIN_TITLE_LENGTH {
            Some("validation.title.length")
        } else if length > MAX_TITLE_LENGTH {
            Some("validation.title.maxlength")
        } else {
            None
        }
    }
}

// POST /api/ideas
pub async fn handle_create_idea_request(
    State(app_state): State<AppState>,
    Extension(CurrentTenant(tenant)): Extension<CurrentTenant>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(RequestLocale(locale)): Extension<RequestLocale>,
    Json(payload): Json<CreateIdeaDto>,
) -> Result<(StatusCode, Json<Value>), ApplicationError> {
    if let Some(key) = payload.validate() {
        let message = app_state.locales.translate(Some(locale), key)?;
        return Err(ApplicationError::validation(message));
    }

    let idea = app_state
        .ideas
        .create_idea(
            tenant.id,
            user.user_id,
            payload.title.trim(),
            payload.description.trim(),
        )
        .await?;
    info!("Idea #{} created on tenant {} by user {}", idea.number, tenant.id, user.user_id);

    let message = app_state.locales.translate_with(
        Some(locale),
        "ideas.created",
        &json!({ "name": user.name, "number": idea.number }),
    )?;
    Ok((StatusCode::CREATED, Json(json!({ "idea": idea, "message": message }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(title: &str) -> CreateIdeaDto {
        CreateIdeaDto {
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_title_rules() {
        assert_eq!(dto("").validate(), Some("validation.title.required"));
        assert_eq!(dto("    ").validate(), Some("validation.title.required"));
        assert_eq!(dto("Dark mode").validate(), Some("validation.title.length"));
        assert_eq!(dto("  Dark mode  ").validate(), Some("validation.title.length"));
        assert_eq!(dto("Add a dark mode").validate(), None);
        // Length counts characters, not bytes
        assert_eq!(dto("ações açã").validate(), Some("validation.title.length"));
        assert_eq!(dto(&"a".repeat(100)).validate(), None);
        assert_eq!(dto(&"a".repeat(101)).validate(), Some("validation.title.maxlength"));
        assert_eq!(dto(&"ç".repeat(100)).validate(), None);
    }
}
