use std::time::Duration;

use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::InvalidDocId;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Conflict(String),

    #[error("request exceeded the {}s deadline", .0.as_secs())]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            Validation(_) => StatusCode::BAD_REQUEST,
            Authentication(_) => StatusCode::UNAUTHORIZED,
            NotFound(_) | Store(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Conflict(_) => StatusCode::CONFLICT,
            Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Config(_) | Store(_) | Migrate(_) | Session(_) | Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && !matches!(self, AppError::Timeout(_)) {
            tracing::error!(error = ?self, "request failed");
            "internal server error".to_owned()
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Validation(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Validation(err.to_owned())
    }
}

impl From<InvalidDocId> for AppError {
    fn from(err: InvalidDocId) -> Self {
        Self::Validation(err.to_string())
    }
}

macro_rules! rejection_impl {
    ($R:ty) => {
        impl From<$R> for AppError {
            fn from(rejection: $R) -> Self {
                Self::Validation(rejection.body_text())
            }
        }
    };
}

rejection_impl!(JsonRejection);
rejection_impl!(FormRejection);
rejection_impl!(QueryRejection);
