// Database repository for student and parent accounts

use sqlx::PgPool;

use crate::auth::Role;
use crate::error::ApiError;
use crate::users::models::User;

const USER_COLUMNS: &str =
    "id, name, email, parent_email, password_hash, role, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a student and their parent account atomically.
    ///
    /// Both records share the password hash but have distinct identity and
    /// role. Running both inserts in one transaction means a failure on the
    /// second insert leaves no orphaned student behind; a unique-index
    /// violation on either email rolls back and maps to Conflict.
    pub async fn create_student_with_parent(
        &self,
        name: &str,
        email: &str,
        parent_email: &str,
        password_hash: &str,
    ) -> Result<(User, User), ApiError> {
        let mut tx = self.pool.begin().await?;

        let student = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, parent_email, password_hash, role) \
             VALUES ($1, $2, $3, $4, 'student') RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(parent_email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::translate_unique)?;

        let parent_name = format!("Parent of {}", name);
        let parent = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, parent_email, password_hash, role) \
             VALUES ($1, $2, NULL, $3, 'parent') RETURNING {USER_COLUMNS}"
        ))
        .bind(&parent_name)
        .bind(parent_email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(Self::translate_unique)?;

        tx.commit().await?;
        Ok((student, parent))
    }

    fn translate_unique(e: sqlx::Error) -> ApiError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::Conflict("Email already registered".to_string());
            }
        }
        ApiError::Database(e)
    }

    /// Find a user by email (case-insensitive), any role
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email, scoped to one role
    pub async fn find_by_email_and_role(
        &self,
        email: &str,
        role: Role,
    ) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) AND role = $2"
        ))
        .bind(email)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Students whose parent_email matches this parent's email (weak
    /// relation; an unmatched email yields an empty list)
    pub async fn linked_students(&self, parent_email: &str) -> Result<Vec<User>, ApiError> {
        let students = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = 'student' AND LOWER(parent_email) = LOWER($1) ORDER BY id"
        ))
        .bind(parent_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Update a user's own profile fields; omitted fields keep their value
    pub async fn update_profile(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE users SET \
               name = COALESCE($1, name), \
               email = COALESCE($2, email), \
               password_hash = COALESCE($3, password_hash), \
               updated_at = NOW() \
             WHERE id = $4",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Self::translate_unique)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}
