use std::fmt;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    auth::{guard::Rejection, password::PasswordError, token::TokenError},
    storage::StorageError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Product,
    Category,
    CarouselImage,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Product => "Product",
            Entity::Category => "Category",
            Entity::CarouselImage => "Carousel image",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("no such route")]
    RouteNotFound,
    #[error("request rejected: {0}")]
    Unauthorized(#[from] Rejection),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("{0}")]
    BadRequest(String),
    #[error("upload exceeds size limit")]
    PayloadTooLarge,
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    PasswordHash(#[from] PasswordError),
}

impl AppError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RouteNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(rejection) => rejection.status(),
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::MissingFields(_) | AppError::InvalidField { .. } | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Sqlx(_)
            | AppError::Storage(_)
            | AppError::Token(_)
            | AppError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client. Server faults never expose their cause.
    pub fn client_message(&self) -> String {
        match self {
            AppError::MethodNotAllowed => "Method not allowed.".to_string(),
            AppError::RouteNotFound => "Resource not found.".to_string(),
            AppError::Unauthorized(rejection) => rejection.to_string(),
            AppError::InvalidCredentials => "Invalid email or password.".to_string(),
            AppError::MissingFields(fields) => {
                format!("Missing required fields: {}", fields.join(", "))
            }
            AppError::InvalidField { field, reason } => {
                format!("Invalid value for field '{field}': {reason}")
            }
            AppError::BadRequest(message) => message.clone(),
            AppError::PayloadTooLarge => "Upload exceeds size limit.".to_string(),
            AppError::NotFound(entity) => format!("{entity} not found."),
            AppError::Sqlx(_)
            | AppError::Storage(_)
            | AppError::Token(_)
            | AppError::PasswordHash(_) => "Internal server error.".to_string(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(format!("Malformed form data: {}", err.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let mut body = json!({
            "success": false,
            "message": self.client_message(),
        });
        match &self {
            AppError::MissingFields(fields) => body["missing_fields"] = json!(fields),
            AppError::InvalidField { field, .. } => body["field"] = json!(field),
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
