// HTTP handlers for admin-side batch endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::batches::error::BatchError;
use crate::batches::models::{
    AddStudentsRequest, AnnouncementEnvelope, AnnouncementListEnvelope, BatchEnvelope,
    BatchListEnvelope, CreateAnnouncementRequest, CreateBatchRequest,
};
use crate::AppState;

/// Handler for POST /admin/batches
/// Creates a batch owned by the teacher named in the body
pub async fn create_batch(
    State(state): State<AppState>,
    Json(request): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<BatchEnvelope>), BatchError> {
    request.validate()?;

    let batch = state.batches.create_batch(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BatchEnvelope {
            success: true,
            message: Some("Batch created successfully".to_string()),
            batch,
        }),
    ))
}

/// Handler for GET /admin/batches
pub async fn list_batches(
    State(state): State<AppState>,
) -> Result<Json<BatchListEnvelope>, BatchError> {
    let batches = state.batches.list_batches().await?;
    Ok(Json(BatchListEnvelope {
        success: true,
        batches,
    }))
}

/// Handler for GET /admin/batches/:batchId
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<i32>,
) -> Result<Json<BatchEnvelope>, BatchError> {
    let batch = state.batches.get_batch(batch_id).await?;
    Ok(Json(BatchEnvelope {
        success: true,
        message: None,
        batch,
    }))
}

/// Handler for POST /admin/batches/:batchId/students
/// Appends students to the roster; rejects the whole request if any id does
/// not resolve to a student account
pub async fn add_students(
    State(state): State<AppState>,
    Path(batch_id): Path<i32>,
    Json(request): Json<AddStudentsRequest>,
) -> Result<Json<BatchEnvelope>, BatchError> {
    request.validate()?;

    let batch = state
        .batches
        .add_students(batch_id, &request.student_ids)
        .await?;

    Ok(Json(BatchEnvelope {
        success: true,
        message: Some("Students added to batch".to_string()),
        batch,
    }))
}

/// Handler for POST /admin/batches/:batchId/announcements
///
/// Requires a verified bearer token whose subject owns the batch. A raw
/// admin id in the Authorization header is rejected by the extractor before
/// this handler runs.
pub async fn create_announcement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(batch_id): Path<i32>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<AnnouncementEnvelope>), BatchError> {
    request.validate()?;

    let announcement = state
        .batches
        .create_announcement(&user, batch_id, &request.title, &request.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AnnouncementEnvelope {
            success: true,
            message: "Announcement posted".to_string(),
            announcement,
        }),
    ))
}

/// Handler for GET /admin/batches/:batchId/announcements
/// Returns the batch's announcements newest first
pub async fn list_announcements(
    State(state): State<AppState>,
    Path(batch_id): Path<i32>,
) -> Result<Json<AnnouncementListEnvelope>, BatchError> {
    let announcements = state.batches.list_announcements(batch_id).await?;
    Ok(Json(AnnouncementListEnvelope {
        success: true,
        announcements,
    }))
}
