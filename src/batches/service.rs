// Batch business logic: ownership, enrollment, and projection rules

use std::collections::HashSet;

use crate::auth::{AuthenticatedUser, Role};
use crate::batches::error::BatchError;
use crate::batches::models::{
    AnnouncementView, Batch, BatchDetail, BatchSummary, CreateBatchRequest, StudentBatchesEntry,
    StudentInfo,
};
use crate::batches::repository::BatchRepository;

#[derive(Clone)]
pub struct BatchService {
    repo: BatchRepository,
}

impl BatchService {
    pub fn new(repo: BatchRepository) -> Self {
        Self { repo }
    }

    /// Create a batch owned by an existing teacher.
    ///
    /// The code is normalized to uppercase before both the pre-check and the
    /// insert, so "cs101" and "CS101" name the same batch.
    pub async fn create_batch(&self, request: CreateBatchRequest) -> Result<BatchDetail, BatchError> {
        let teacher = self
            .repo
            .find_teacher(request.teacher_id)
            .await?
            .ok_or(BatchError::TeacherNotFound(request.teacher_id))?;

        let code = request.batch_code.to_uppercase();
        if self.repo.find_by_code(&code).await?.is_some() {
            return Err(BatchError::CodeTaken(code));
        }

        let batch = self
            .repo
            .create(&code, &request.name, &request.class_label, teacher.id)
            .await?;

        tracing::info!("Created batch {} ({})", batch.id, batch.batch_code);
        self.populate(batch).await
    }

    pub async fn get_batch(&self, batch_id: i32) -> Result<BatchDetail, BatchError> {
        let batch = self
            .repo
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| BatchError::BatchNotFound(batch_id.to_string()))?;

        self.populate(batch).await
    }

    pub async fn list_batches(&self) -> Result<Vec<BatchDetail>, BatchError> {
        let mut details = Vec::new();
        for batch in self.repo.list().await? {
            details.push(self.populate(batch).await?);
        }
        Ok(details)
    }

    /// Append students to a roster, all-or-nothing.
    ///
    /// Every id must resolve to a user with the student role; if any does
    /// not, the whole request is rejected and the roster is untouched. Ids
    /// already on the roster are skipped, not errors.
    pub async fn add_students(
        &self,
        batch_id: i32,
        student_ids: &[i32],
    ) -> Result<BatchDetail, BatchError> {
        let batch = self
            .repo
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| BatchError::BatchNotFound(batch_id.to_string()))?;

        let resolved = self.repo.find_students_by_ids(student_ids).await?;
        let resolved_ids: HashSet<i32> = resolved.iter().map(|s| s.id).collect();
        let missing: Vec<i32> = student_ids
            .iter()
            .copied()
            .filter(|id| !resolved_ids.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(BatchError::NotStudents(missing));
        }

        self.repo.add_students(batch.id, student_ids).await?;

        // Re-fetch so the projection carries the updated_at the append set
        let batch = self
            .repo
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| BatchError::BatchNotFound(batch_id.to_string()))?;
        self.populate(batch).await
    }

    /// Student-initiated enrollment by batch code.
    pub async fn join_by_code(
        &self,
        user: &AuthenticatedUser,
        batch_code: &str,
    ) -> Result<BatchSummary, BatchError> {
        if user.role != Role::Student {
            return Err(BatchError::NotAStudent);
        }

        let code = batch_code.to_uppercase();
        let batch = self
            .repo
            .find_by_code(&code)
            .await?
            .ok_or(BatchError::BatchNotFound(code))?;

        if self.repo.is_enrolled(batch.id, user.user_id).await? {
            return Err(BatchError::AlreadyEnrolled);
        }

        self.repo.enroll(batch.id, user.user_id).await?;
        tracing::info!(
            "Student {} joined batch {} ({})",
            user.user_id,
            batch.id,
            batch.batch_code
        );

        self.summarize(batch).await
    }

    /// Post an announcement; only the owning teacher may do so.
    pub async fn create_announcement(
        &self,
        user: &AuthenticatedUser,
        batch_id: i32,
        title: &str,
        content: &str,
    ) -> Result<AnnouncementView, BatchError> {
        let batch = self
            .repo
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| BatchError::BatchNotFound(batch_id.to_string()))?;

        if user.role != Role::Admin || batch.teacher_id != user.user_id {
            return Err(BatchError::NotBatchOwner);
        }

        let teacher = self
            .repo
            .find_teacher(batch.teacher_id)
            .await?
            .ok_or(BatchError::TeacherNotFound(batch.teacher_id))?;

        let announcement = self
            .repo
            .add_announcement(batch.id, title, content, teacher.id)
            .await?;

        Ok(AnnouncementView {
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            teacher,
            created_at: announcement.created_at,
        })
    }

    /// Announcements for a batch, newest first.
    pub async fn list_announcements(
        &self,
        batch_id: i32,
    ) -> Result<Vec<AnnouncementView>, BatchError> {
        if self.repo.find_by_id(batch_id).await?.is_none() {
            return Err(BatchError::BatchNotFound(batch_id.to_string()));
        }

        let rows = self.repo.list_announcements(batch_id).await?;
        Ok(rows.into_iter().map(AnnouncementView::from).collect())
    }

    /// Batches a student is enrolled in. The caller must already be verified
    /// as that student.
    pub async fn batches_for_student(
        &self,
        student_id: i32,
    ) -> Result<Vec<BatchSummary>, BatchError> {
        self.repo.list_by_student(student_id).await
    }

    /// One batch scoped to an enrolled student.
    pub async fn batch_for_student(
        &self,
        batch_id: i32,
        student_id: i32,
    ) -> Result<BatchDetail, BatchError> {
        let batch = self
            .repo
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| BatchError::BatchNotFound(batch_id.to_string()))?;

        if !self.repo.is_enrolled(batch.id, student_id).await? {
            return Err(BatchError::NotEnrolled);
        }

        self.populate(batch).await
    }

    /// Batches of every student linked to a parent's email. A broken link
    /// (no student names this parent) is an empty list, not an error.
    pub async fn batches_for_parent(
        &self,
        parent_email: &str,
    ) -> Result<Vec<StudentBatchesEntry>, BatchError> {
        let mut entries = Vec::new();
        for student in self.repo.linked_students(parent_email).await? {
            let batches = self.repo.list_by_student(student.id).await?;
            entries.push(StudentBatchesEntry { student, batches });
        }
        Ok(entries)
    }

    /// One batch scoped to a parent viewing a linked, enrolled student.
    pub async fn batch_for_parent(
        &self,
        batch_id: i32,
        parent_email: &str,
        student_id: i32,
    ) -> Result<BatchDetail, BatchError> {
        let (student, linked_email) = self
            .repo
            .find_student_with_parent(student_id)
            .await?
            .ok_or(BatchError::StudentNotFound(student_id))?;

        let linked = linked_email
            .map(|e| e.eq_ignore_ascii_case(parent_email))
            .unwrap_or(false);
        if !linked {
            return Err(BatchError::IdentityMismatch);
        }

        self.batch_for_student(batch_id, student.id).await
    }

    async fn populate(&self, batch: Batch) -> Result<BatchDetail, BatchError> {
        let teacher = self
            .repo
            .find_teacher(batch.teacher_id)
            .await?
            .ok_or(BatchError::TeacherNotFound(batch.teacher_id))?;
        let students: Vec<StudentInfo> = self.repo.roster(batch.id).await?;

        Ok(BatchDetail {
            id: batch.id,
            batch_code: batch.batch_code,
            name: batch.name,
            class_label: batch.class_label,
            active: true,
            teacher,
            students,
            created_at: batch.created_at,
            updated_at: batch.updated_at,
        })
    }

    async fn summarize(&self, batch: Batch) -> Result<BatchSummary, BatchError> {
        let teacher = self
            .repo
            .find_teacher(batch.teacher_id)
            .await?
            .ok_or(BatchError::TeacherNotFound(batch.teacher_id))?;

        Ok(BatchSummary {
            id: batch.id,
            batch_code: batch.batch_code,
            name: batch.name,
            class_label: batch.class_label,
            teacher_name: teacher.name,
        })
    }
}
