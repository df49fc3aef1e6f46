// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingToken => {
                warn!("Missing token in request");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::PasswordHash(msg) => {
                error!("Password hashing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AuthError::TokenGeneration(msg) => {
                error!("Token generation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
