// Database repository for administrator accounts

use sqlx::PgPool;

use crate::admin::models::AdminUser;
use crate::error::ApiError;

const ADMIN_COLUMNS: &str =
    "id, name, email, password_hash, role, active, created_at, updated_at";

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new administrator.
    ///
    /// The unique index on email is the authoritative duplicate check: a
    /// racing registration that passed the handler's pre-check still fails
    /// here, and the violation is translated into the same Conflict.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminUser, ApiError> {
        sqlx::query_as::<_, AdminUser>(&format!(
            "INSERT INTO admin_users (name, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return ApiError::Conflict("Email already registered".to_string());
                }
            }
            ApiError::Database(e)
        })
    }

    /// Find an administrator by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, ApiError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// List all administrators, oldest first
    pub async fn list(&self) -> Result<Vec<AdminUser>, ApiError> {
        let admins = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }
}
