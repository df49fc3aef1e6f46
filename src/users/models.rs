// Student/parent data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::Role;

/// User database model (student or parent).
///
/// `parent_email` is a weak relation: a student's value is matched against a
/// parent user's email by string equality. It is never enforced at write
/// time, and a broken link surfaces as an empty result set downstream.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub parent_email: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User public fields (excludes password_hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "parentEmail", skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    pub role: Role,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            parent_email: user.parent_email,
            role: user.role,
        }
    }
}

/// Registration request DTO: creates a student and their parent account in
/// one request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(rename = "parentEmail")]
    #[validate(email)]
    pub parent_email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Login request DTO (shared by the generic, student, and parent variants)
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Profile update request DTO; all fields optional
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

/// Join-by-code request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct JoinBatchRequest {
    #[validate(custom = "crate::validation::validate_batch_code")]
    pub batch_code: String,
}

/// Response for registration and student logins
#[derive(Debug, Serialize)]
pub struct UserAuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserPublic,
}

/// Response for parent login; includes the students linked to this parent's
/// email
#[derive(Debug, Serialize)]
pub struct ParentLoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserPublic,
    #[serde(rename = "linkedStudents")]
    pub linked_students: Vec<UserPublic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_parent_email_rename() {
        let json = r#"{"name":"S","email":"s@x.com","parentEmail":"p@x.com","password":"secret1"}"#;
        let req: RegisterUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.parent_email, "p@x.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_parent_email() {
        let json = r#"{"name":"S","email":"s@x.com","parentEmail":"nope","password":"secret1"}"#;
        let req: RegisterUserRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_public_projection_hides_hash_and_empty_parent_link() {
        let user = User {
            id: 1,
            name: "P".to_string(),
            email: "p@x.com".to_string(),
            parent_email: None,
            password_hash: "$argon2id$...".to_string(),
            role: Role::Parent,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserPublic::from(user)).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("parentEmail"));
        assert!(json.contains("\"role\":\"parent\""));
    }

    #[test]
    fn test_update_profile_allows_partial_body() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name":"New Name"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
