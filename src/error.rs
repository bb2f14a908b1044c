use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

#[derive(Debug, Error)]
pub enum AppError {
    /// `param` names the identifier that did not resolve, e.g. `parkingSpotId`.
    #[error("{param} not found")]
    NotFound { param: &'static str },

    #[error("startDate must be before endDate")]
    InvalidDateRange,

    #[error("endDate must be a date in the future")]
    ExpiredRange,

    #[error("found an existing booking with the given dates")]
    OverlappingBooking,

    #[error("invalid {param}: {message}")]
    Validation { param: String, message: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(param: &'static str) -> Self {
        Self::NotFound { param }
    }

    pub fn validation(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidDateRange | Self::ExpiredRange | Self::OverlappingBooking => {
                StatusCode::BAD_REQUEST
            }
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn to_message(&self) -> ErrorMessage {
        match self {
            Self::NotFound { param } => ErrorMessage::new(NOT_FOUND_MESSAGE, Some(*param)),
            Self::InvalidDateRange => {
                ErrorMessage::new(self.to_string(), Some("invalidStartDate"))
            }
            Self::ExpiredRange => ErrorMessage::new(self.to_string(), Some("invalidEndDate")),
            Self::OverlappingBooking => {
                ErrorMessage::new(self.to_string(), Some("overlappingBooking"))
            }
            Self::Validation { param, message } => {
                ErrorMessage::new(message.clone(), Some(param.clone()))
            }
            Self::Forbidden(msg) | Self::Conflict(msg) => {
                ErrorMessage::new(msg.clone(), None::<String>)
            }
            Self::Unauthorized => ErrorMessage::new(UNAUTHORIZED_MESSAGE, None::<String>),
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                ErrorMessage::new("Internal Server Error", None::<String>)
            }
        }
    }
}

/// One entry of the `{"error": {"errors": [...]}}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl ErrorMessage {
    fn new(message: impl Into<String>, param: Option<impl Into<String>>) -> Self {
        Self {
            message: message.into(),
            param: param.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorMessage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                errors: vec![self.to_message()],
            },
        };

        (status, Json(body)).into_response()
    }
}
