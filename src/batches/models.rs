// Batch data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Batch database model
#[derive(Debug, Clone, FromRow)]
pub struct Batch {
    pub id: i32,
    pub batch_code: String,
    pub name: String,
    pub class_label: String,
    pub teacher_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Announcement database model (lifecycle bound to its batch)
#[derive(Debug, Clone, FromRow)]
pub struct Announcement {
    pub id: i32,
    pub batch_id: i32,
    pub title: String,
    pub content: String,
    pub teacher_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Teacher display fields embedded in batch and announcement projections
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeacherInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Student display fields embedded in roster projections
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Fully populated batch projection returned by admin and detail routes
#[derive(Debug, Serialize)]
pub struct BatchDetail {
    pub id: i32,
    pub batch_code: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_label: String,
    /// Vestigial display field: batches have no archive transition
    pub active: bool,
    pub teacher: TeacherInfo,
    pub students: Vec<StudentInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact batch projection for student/parent listings
#[derive(Debug, Serialize, FromRow)]
pub struct BatchSummary {
    pub id: i32,
    pub batch_code: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_label: String,
    pub teacher_name: String,
}

/// Announcement projection with teacher identity populated
#[derive(Debug, Serialize)]
pub struct AnnouncementView {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub teacher: TeacherInfo,
    pub created_at: DateTime<Utc>,
}

/// Flat row used to join announcements with their teacher in one query
#[derive(Debug, FromRow)]
pub struct AnnouncementRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub teacher_id: i32,
    pub teacher_name: String,
    pub teacher_email: String,
}

impl From<AnnouncementRow> for AnnouncementView {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            teacher: TeacherInfo {
                id: row.teacher_id,
                name: row.teacher_name,
                email: row.teacher_email,
            },
            created_at: row.created_at,
        }
    }
}

/// Request DTO for POST /admin/batches
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchRequest {
    #[validate(custom = "crate::validation::validate_batch_code")]
    pub batch_code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 50))]
    pub class_label: String,
    pub teacher_id: i32,
}

/// Request DTO for POST /admin/batches/:batchId/students
#[derive(Debug, Deserialize, Validate)]
pub struct AddStudentsRequest {
    #[serde(rename = "studentIds")]
    #[validate(length(min = 1))]
    pub student_ids: Vec<i32>,
}

/// Request DTO for POST /admin/batches/:batchId/announcements
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

// Response envelopes

#[derive(Debug, Serialize)]
pub struct BatchEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub batch: BatchDetail,
}

#[derive(Debug, Serialize)]
pub struct BatchListEnvelope {
    pub success: bool,
    pub batches: Vec<BatchDetail>,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementEnvelope {
    pub success: bool,
    pub message: String,
    pub announcement: AnnouncementView,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementListEnvelope {
    pub success: bool,
    pub announcements: Vec<AnnouncementView>,
}

#[derive(Debug, Serialize)]
pub struct JoinBatchResponse {
    pub success: bool,
    pub message: String,
    pub batch: BatchSummary,
}

#[derive(Debug, Serialize)]
pub struct BatchSummariesResponse {
    pub success: bool,
    pub batches: Vec<BatchSummary>,
}

/// One linked student with the batches they are enrolled in
#[derive(Debug, Serialize)]
pub struct StudentBatchesEntry {
    pub student: StudentInfo,
    pub batches: Vec<BatchSummary>,
}

#[derive(Debug, Serialize)]
pub struct ParentStudentBatchesResponse {
    pub success: bool,
    pub students: Vec<StudentBatchesEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_students_request_field_name() {
        let json = r#"{"studentIds":[1,2,3]}"#;
        let req: AddStudentsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.student_ids, vec![1, 2, 3]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_add_students_request_rejects_empty_list() {
        let json = r#"{"studentIds":[]}"#;
        let req: AddStudentsRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_batch_request_class_rename() {
        let json = r#"{"batch_code":"cs101","name":"CS","class":"10","teacher_id":1}"#;
        let req: CreateBatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.class_label, "10");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_batch_detail_serializes_class_field() {
        let detail = BatchDetail {
            id: 1,
            batch_code: "CS101".to_string(),
            name: "CS".to_string(),
            class_label: "10".to_string(),
            active: true,
            teacher: TeacherInfo {
                id: 1,
                name: "A".to_string(),
                email: "a@x.com".to_string(),
            },
            students: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"class\":\"10\""));
        assert!(json.contains("\"active\":true"));
        assert!(!json.contains("class_label"));
    }
}
