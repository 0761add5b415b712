//! Tasklane API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tasklane_core::error::{AppError, ValidationErrors};
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying migrations failed.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// The OTLP exporter could not be built.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Seeding the identity store failed.
    #[error("identity seeding failed: {0}")]
    Seed(#[from] AppError),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Validation failures keyed by field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A failure returned by the mediator.
    App(AppError),
    /// The id in the path differs from the id in the body.
    IdMismatch {
        /// Id from the route.
        path: i64,
        /// Id from the request body.
        body: i64,
    },
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

fn status_and_code(err: &AppError) -> (StatusCode, &'static str) {
    match err {
        AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        AppError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
        AppError::DataLayer(_) => (StatusCode::INTERNAL_SERVER_ERROR, "data_layer_error"),
        AppError::Publish(_) => (StatusCode::INTERNAL_SERVER_ERROR, "publish_error"),
        AppError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::IdMismatch { path, body } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "id_mismatch",
                    message: format!("route id {path} does not match body id {body}"),
                    errors: None,
                },
            ),
            Self::App(err) => {
                let (status, error) = status_and_code(&err);
                let message = err.to_string();
                let errors = match err {
                    AppError::Validation(errors) => Some(errors),
                    _ => None,
                };
                (
                    status,
                    ErrorBody {
                        error,
                        message,
                        errors,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
