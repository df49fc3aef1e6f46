// Database repository for batches, rosters, and announcements

use sqlx::PgPool;

use crate::batches::error::BatchError;
use crate::batches::models::{
    Announcement, AnnouncementRow, Batch, BatchSummary, StudentInfo, TeacherInfo,
};

const BATCH_COLUMNS: &str =
    "id, batch_code, name, class_label, teacher_id, created_at, updated_at";

#[derive(Clone)]
pub struct BatchRepository {
    pool: PgPool,
}

impl BatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a batch with an empty roster.
    ///
    /// The unique index on batch_code catches the race the handler's
    /// pre-check cannot; the violation maps to the same Conflict.
    pub async fn create(
        &self,
        batch_code: &str,
        name: &str,
        class_label: &str,
        teacher_id: i32,
    ) -> Result<Batch, BatchError> {
        sqlx::query_as::<_, Batch>(&format!(
            "INSERT INTO batches (batch_code, name, class_label, teacher_id) \
             VALUES ($1, $2, $3, $4) RETURNING {BATCH_COLUMNS}"
        ))
        .bind(batch_code)
        .bind(name)
        .bind(class_label)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return BatchError::CodeTaken(batch_code.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Batch>, BatchError> {
        let batch = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    /// Find a batch by its (already uppercased) code
    pub async fn find_by_code(&self, batch_code: &str) -> Result<Option<Batch>, BatchError> {
        let batch = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE batch_code = $1"
        ))
        .bind(batch_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    pub async fn list(&self) -> Result<Vec<Batch>, BatchError> {
        let batches = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Teacher display fields for a batch projection
    pub async fn find_teacher(&self, teacher_id: i32) -> Result<Option<TeacherInfo>, BatchError> {
        let teacher = sqlx::query_as::<_, TeacherInfo>(
            "SELECT id, name, email FROM admin_users WHERE id = $1",
        )
        .bind(teacher_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(teacher)
    }

    /// Resolve ids to student accounts only (role = 'student')
    pub async fn find_students_by_ids(&self, ids: &[i32]) -> Result<Vec<StudentInfo>, BatchError> {
        let students = sqlx::query_as::<_, StudentInfo>(
            "SELECT id, name, email FROM users WHERE role = 'student' AND id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Roster of a batch in insertion order
    pub async fn roster(&self, batch_id: i32) -> Result<Vec<StudentInfo>, BatchError> {
        let students = sqlx::query_as::<_, StudentInfo>(
            "SELECT u.id, u.name, u.email \
             FROM batch_students bs JOIN users u ON u.id = bs.student_id \
             WHERE bs.batch_id = $1 \
             ORDER BY bs.added_at, u.id",
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    pub async fn is_enrolled(&self, batch_id: i32, student_id: i32) -> Result<bool, BatchError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM batch_students WHERE batch_id = $1 AND student_id = $2)",
        )
        .bind(batch_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Append students to a roster in one transaction.
    ///
    /// `ON CONFLICT DO NOTHING` makes the append idempotent with respect to
    /// ids already on the roster.
    pub async fn add_students(&self, batch_id: i32, student_ids: &[i32]) -> Result<(), BatchError> {
        let mut tx = self.pool.begin().await?;

        for student_id in student_ids {
            sqlx::query(
                "INSERT INTO batch_students (batch_id, student_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(batch_id)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE batches SET updated_at = NOW() WHERE id = $1")
            .bind(batch_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Enroll a single student (join-by-code path).
    /// A racing duplicate join trips the unique pair and maps to Conflict.
    pub async fn enroll(&self, batch_id: i32, student_id: i32) -> Result<(), BatchError> {
        sqlx::query("INSERT INTO batch_students (batch_id, student_id) VALUES ($1, $2)")
            .bind(batch_id)
            .bind(student_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return BatchError::AlreadyEnrolled;
                    }
                }
                e.into()
            })?;

        Ok(())
    }

    /// Batches a student is enrolled in, with teacher name populated
    pub async fn list_by_student(&self, student_id: i32) -> Result<Vec<BatchSummary>, BatchError> {
        let batches = sqlx::query_as::<_, BatchSummary>(
            "SELECT b.id, b.batch_code, b.name, b.class_label, a.name AS teacher_name \
             FROM batch_students bs \
             JOIN batches b ON b.id = bs.batch_id \
             JOIN admin_users a ON a.id = b.teacher_id \
             WHERE bs.student_id = $1 \
             ORDER BY bs.added_at",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Insert an announcement with a server-assigned timestamp
    pub async fn add_announcement(
        &self,
        batch_id: i32,
        title: &str,
        content: &str,
        teacher_id: i32,
    ) -> Result<Announcement, BatchError> {
        let announcement = sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (batch_id, title, content, teacher_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, batch_id, title, content, teacher_id, created_at",
        )
        .bind(batch_id)
        .bind(title)
        .bind(content)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// Announcements for a batch, newest first, teacher identity populated
    pub async fn list_announcements(
        &self,
        batch_id: i32,
    ) -> Result<Vec<AnnouncementRow>, BatchError> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            "SELECT an.id, an.title, an.content, an.created_at, \
                    a.id AS teacher_id, a.name AS teacher_name, a.email AS teacher_email \
             FROM announcements an \
             JOIN admin_users a ON a.id = an.teacher_id \
             WHERE an.batch_id = $1 \
             ORDER BY an.created_at DESC, an.id DESC",
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Linked students of a parent, resolved by email value (weak relation:
    /// a parent email nothing points at yields an empty list, not an error)
    pub async fn linked_students(&self, parent_email: &str) -> Result<Vec<StudentInfo>, BatchError> {
        let students = sqlx::query_as::<_, StudentInfo>(
            "SELECT id, name, email FROM users \
             WHERE role = 'student' AND LOWER(parent_email) = LOWER($1) \
             ORDER BY id",
        )
        .bind(parent_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// A student row with its parent link, for parent-scoped access checks
    pub async fn find_student_with_parent(
        &self,
        student_id: i32,
    ) -> Result<Option<(StudentInfo, Option<String>)>, BatchError> {
        let row: Option<(i32, String, String, Option<String>)> = sqlx::query_as(
            "SELECT id, name, email, parent_email FROM users \
             WHERE role = 'student' AND id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name, email, parent_email)| {
            (StudentInfo { id, name, email }, parent_email)
        }))
    }
}
