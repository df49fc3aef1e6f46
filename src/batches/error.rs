// Error types for batch operations

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    #[error("Teacher not found: {0}")]
    TeacherNotFound(i32),

    #[error("Student not found: {0}")]
    StudentNotFound(i32),

    #[error("Batch code already in use: {0}")]
    CodeTaken(String),

    #[error("Student already enrolled in this batch")]
    AlreadyEnrolled,

    /// Ids that do not resolve to a student account. The whole request is
    /// rejected; no partial roster update happens.
    #[error("Ids do not resolve to student accounts: {0:?}")]
    NotStudents(Vec<i32>),

    #[error("Only students can access this resource")]
    NotAStudent,

    #[error("Only parents can access this resource")]
    NotAParent,

    #[error("Only the batch owner can post announcements")]
    NotBatchOwner,

    #[error("Student is not enrolled in this batch")]
    NotEnrolled,

    /// Query identifier does not match the authenticated account
    #[error("Identifier does not match the authenticated account")]
    IdentityMismatch,

    #[error("Request validation failed")]
    Validation(validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for BatchError {
    fn from(err: sqlx::Error) -> Self {
        BatchError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BatchError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BatchError::Validation(errors)
    }
}

impl IntoResponse for BatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            BatchError::BatchNotFound(_)
            | BatchError::TeacherNotFound(_)
            | BatchError::StudentNotFound(_) => StatusCode::NOT_FOUND,
            BatchError::CodeTaken(_) | BatchError::AlreadyEnrolled => StatusCode::CONFLICT,
            BatchError::NotStudents(_) | BatchError::Validation(_) => StatusCode::BAD_REQUEST,
            BatchError::NotAStudent
            | BatchError::NotAParent
            | BatchError::NotBatchOwner
            | BatchError::NotEnrolled
            | BatchError::IdentityMismatch => StatusCode::FORBIDDEN,
            BatchError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            BatchError::Database(msg) => {
                error!("Database error in batch operation: {}", msg);
                json!({
                    "success": false,
                    "message": "Internal server error",
                })
            }
            BatchError::Validation(errors) => json!({
                "success": false,
                "message": "Request validation failed",
                "details": serde_json::to_value(errors).unwrap_or(json!({})),
            }),
            other => {
                if status == StatusCode::FORBIDDEN {
                    warn!("Forbidden batch operation: {}", other);
                }
                json!({
                    "success": false,
                    "message": other.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_variants() {
        for err in [
            BatchError::CodeTaken("CS101".into()),
            BatchError::AlreadyEnrolled,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_ownership_violations_are_forbidden() {
        for err in [
            BatchError::NotBatchOwner,
            BatchError::NotEnrolled,
            BatchError::NotAStudent,
            BatchError::IdentityMismatch,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
