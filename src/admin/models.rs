// Administrator data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::Role;

/// Administrator database model
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrator public fields (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminPublic {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "asha@school.edu")]
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<AdminUser> for AdminPublic {
    fn from(admin: AdminUser) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
            active: admin.active,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterAdminRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginAdminRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Response for POST /admin/register
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterAdminResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminPublic,
}

/// Compact admin fields returned by the login route
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginFields {
    pub name: String,
    pub email: String,
}

/// Response for POST /admin/login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginAdminResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub admin: AdminLoginFields,
}

/// Response for GET /admin/teachers
#[derive(Debug, Serialize, ToSchema)]
pub struct TeachersResponse {
    pub success: bool,
    pub teachers: Vec<AdminPublic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{"name":"A","email":"a@x.com","password":"secret1"}"#;
        let req: RegisterAdminRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "A");
        assert_eq!(req.email, "a@x.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let json = r#"{"name":"A","email":"a@x.com","password":"abc"}"#;
        let req: RegisterAdminRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_public_projection_excludes_hash() {
        let admin = AdminUser {
            id: 1,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: Role::Admin,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&AdminPublic::from(admin)).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
