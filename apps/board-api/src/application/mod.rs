use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_lib::CoreError;
use i18n::I18nError;
use serde_json::json;
use tracing::error;

use crate::map_core_error;

pub mod authz;
pub mod commands;
pub mod middleware;
pub mod query;

#[derive(thiserror::Error, Debug)]
pub enum ApplicationError {
    #[error("Core Error: {0}")]
    Core(#[from] CoreError),

    #[error("Locale Error: {0}")]
    Locale(#[from] I18nError),

    #[error("Configuration Error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// A 400 carrying an already localized message.
    pub fn validation(message: impl Into<String>) -> Self {
        ApplicationError::Core(CoreError::Validation(message.into()))
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        match self {
            ApplicationError::Core(CoreError::Validation(message)) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApplicationError::Core(err) => {
                let status = map_core_error(&err);
                let message = if status.is_server_error() {
                    "Internal server error".to_string()
                } else {
                    err.to_string()
                };
                (status, Json(json!({ "message": message }))).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApplicationError::validation("Title is required."), StatusCode::BAD_REQUEST),
            (CoreError::NotFound("idea 3".into()).into(), StatusCode::NOT_FOUND),
            (CoreError::Unauthorized("no".into()).into(), StatusCode::UNAUTHORIZED),
            (CoreError::Internal("boom".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                I18nError::CatalogNotFound("en".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::Configuration("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
