//! Error types for the preview server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use og_render::RenderError;
use thiserror::Error;

/// Failures of the static preview endpoint
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::PostNotFound => StatusCode::NOT_FOUND,
            ApiError::Render(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Details stay in the log, the body is fixed text
        let body = match &self {
            ApiError::PostNotFound => "Not found",
            ApiError::Render(_) | ApiError::Database(_) => {
                tracing::error!("OG generation error: {}", self);
                "Error generating image"
            }
        };

        (status, body).into_response()
    }
}
