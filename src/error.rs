use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::settings::SettingsError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Story not found: {0}")]
    StoryNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::StoryNotFound(id) => (
                StatusCode::NOT_FOUND,
                "STORY_NOT_FOUND",
                format!("Story '{}' not found", id),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Settings(e) => (StatusCode::BAD_REQUEST, "SETTINGS_ERROR", e.to_string()),
            AppError::IoError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                e.to_string(),
            ),
            AppError::JsonError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "JSON_ERROR",
                e.to_string(),
            ),
        };

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
