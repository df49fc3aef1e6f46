// Identity types shared across the auth, admin, and user modules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role carried in token claims and stored on every account record.
///
/// Admins live in a separate table from students and parents; the role claim
/// is what lets a single extractor serve both route sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Role {
    Student,
    Parent,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Parent => write!(f, "parent"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// JWT claims structure.
///
/// Every issued token carries the role; the legacy admin login path that
/// omitted it produced tokens the role checks could not evaluate, so issuance
/// is standardized here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (user or admin, depending on role)
    pub sub: i32,
    pub email: String,
    pub role: Role,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiration timestamp (seconds)
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), "\"parent\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_role_deserializes_from_lowercase() {
        let role: Role = serde_json::from_str("\"parent\"").unwrap();
        assert_eq!(role, Role::Parent);
    }
}
