// Error handling module for the Batchroom API
// Provides the shared error taxonomy and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::error::AuthError;

/// Main error type for the API
///
/// Every handler converts its failures into one of these variants; nothing is
/// allowed to propagate unhandled to the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed; field-level errors are returned verbatim
    /// so clients can render per-field messages. Maps to 400.
    #[error("Request validation failed")]
    Validation(validator::ValidationErrors),

    /// Referenced entity does not exist. Maps to 404.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Duplicate email, batch code, or enrollment. Maps to 409.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or missing/invalid/expired token. Maps to 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Ownership or role violation. Maps to 403.
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected store failure. Maps to 500; details stay in the logs.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Any other unexpected failure. Maps to 500.
    #[error("Internal server error")]
    Internal(String),
}

/// JSON body shared by every error response:
/// `{ "success": false, "message": …, "details": … }`
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    fn to_error_response(&self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Validation(errors) => {
                debug!("Validation error: {:?}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        success: false,
                        message: "Request validation failed".to_string(),
                        details: Some(
                            serde_json::to_value(errors).unwrap_or(serde_json::json!({})),
                        ),
                    },
                )
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} '{}'", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    ErrorBody {
                        success: false,
                        message: format!("{} not found: {}", resource, id),
                        details: None,
                    },
                )
            }
            ApiError::Conflict(message) => {
                warn!("Conflict: {}", message);
                (
                    StatusCode::CONFLICT,
                    ErrorBody {
                        success: false,
                        message: message.clone(),
                        details: None,
                    },
                )
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody {
                        success: false,
                        message: message.clone(),
                        details: None,
                    },
                )
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                (
                    StatusCode::FORBIDDEN,
                    ErrorBody {
                        success: false,
                        message: message.clone(),
                        details: None,
                    },
                )
            }
            ApiError::Database(db_error) => {
                // Full detail stays in the logs; clients get a generic message
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        message: "Internal server error".to_string(),
                        details: None,
                    },
                )
            }
            ApiError::Internal(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        message: "Internal server error".to_string(),
                        details: None,
                    },
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::PasswordHash(msg) | AuthError::TokenGeneration(msg) => {
                ApiError::Internal(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::NotFound {
                resource: "Batch".into(),
                id: "7".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_shape() {
        let (status, body) = ApiError::Conflict("Email already registered".into())
            .to_error_response();
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!body.success);
        assert_eq!(body.message, "Email already registered");
        assert!(body.details.is_none());
    }
}
