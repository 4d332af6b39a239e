//! Error handling module
//!
//! Provides unified error types and their rendering as event responses.

use crate::event::ContentResponse;
use axum::http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database configuration missing")]
    MissingDatabase,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Validation failed")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingDatabase => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MalformedBody(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingDatabase => "CONFIG_ERROR",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::MalformedBody(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Pool(_) => "POOL_EXHAUSTED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn to_body(&self) -> ErrorResponse {
        match self {
            AppError::Validation(fields) => ErrorResponse {
                error: describe_fields(fields),
                code: self.code(),
                fields: Some(fields.clone()),
            },
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                ErrorResponse {
                    error: "A database error occurred".to_string(),
                    code: self.code(),
                    fields: None,
                }
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                ErrorResponse {
                    error: "Database connection unavailable".to_string(),
                    code: self.code(),
                    fields: None,
                }
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse {
                    error: "An internal error occurred".to_string(),
                    code: self.code(),
                    fields: None,
                }
            }
            AppError::MissingDatabase => {
                error!("DATABASE_URL is not configured");
                ErrorResponse {
                    error: self.to_string(),
                    code: self.code(),
                    fields: None,
                }
            }
            AppError::MethodNotAllowed | AppError::MalformedBody(_) => ErrorResponse {
                error: self.to_string(),
                code: self.code(),
                fields: None,
            },
        }
    }
}

impl From<AppError> for ContentResponse {
    fn from(err: AppError) -> Self {
        ContentResponse::json(err.status(), &err.to_body())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        AppError::Validation(fields)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedBody(err.to_string())
    }
}

fn describe_fields(fields: &BTreeMap<String, Vec<String>>) -> String {
    let parts: Vec<String> = fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect();
    format!("Invalid fields: {}", parts.join("; "))
}

/// Result type alias for handler operations
pub type ApiResult<T> = Result<T, AppError>;
