// HTTP handlers for student/parent endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::{AuthenticatedUser, Role};
use crate::batches::error::BatchError;
use crate::batches::models::{
    BatchEnvelope, BatchSummariesResponse, JoinBatchResponse, ParentStudentBatchesResponse,
};
use crate::error::ApiError;
use crate::response::MessageResponse;
use crate::users::models::{
    JoinBatchRequest, LoginUserRequest, ParentLoginResponse, RegisterUserRequest,
    UpdateProfileRequest, UserAuthResponse, UserPublic,
};
use crate::AppState;

/// Handler for POST /user/register
///
/// Creates a student account and its parent account in one transaction:
/// either both exist afterwards or neither does.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserAuthResponse>), ApiError> {
    request.validate()?;

    // Pre-checks give a friendly message naming the offending address; the
    // unique index on users.email is what actually wins a race.
    if state.users.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Email already registered: {}",
            request.email
        )));
    }
    if state
        .users
        .find_by_email(&request.parent_email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "Email already registered: {}",
            request.parent_email
        )));
    }

    // Hashed once; both accounts share the hash by contract
    let password_hash = state.passwords.hash(&request.password)?;
    let (student, _parent) = state
        .users
        .create_student_with_parent(
            &request.name,
            &request.email,
            &request.parent_email,
            &password_hash,
        )
        .await?;

    let token = state
        .tokens
        .issue_user_token(student.id, &student.email, Role::Student)?;

    tracing::info!(
        "Registered student {} with linked parent {}",
        student.id,
        request.parent_email
    );
    Ok((
        StatusCode::CREATED,
        Json(UserAuthResponse {
            success: true,
            message: "Registration successful".to_string(),
            token,
            user: UserPublic::from(student),
        }),
    ))
}

/// Handler for POST /user/login (either role)
pub async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginUserRequest>,
) -> Result<Json<UserAuthResponse>, ApiError> {
    request.validate()?;

    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "User account".to_string(),
            id: request.email.clone(),
        })?;

    verify_password(&state, &request.password, &user.password_hash).await?;

    let token = state
        .tokens
        .issue_user_token(user.id, &user.email, user.role)?;

    Ok(Json(UserAuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserPublic::from(user),
    }))
}

/// Handler for POST /user/login/student
pub async fn login_student(
    State(state): State<AppState>,
    Json(request): Json<LoginUserRequest>,
) -> Result<Json<UserAuthResponse>, ApiError> {
    request.validate()?;

    let user = state
        .users
        .find_by_email_and_role(&request.email, Role::Student)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Student account".to_string(),
            id: request.email.clone(),
        })?;

    verify_password(&state, &request.password, &user.password_hash).await?;

    let token = state
        .tokens
        .issue_user_token(user.id, &user.email, Role::Student)?;

    Ok(Json(UserAuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserPublic::from(user),
    }))
}

/// Handler for POST /user/login/parent
/// Additionally returns the students linked to this parent's email
pub async fn login_parent(
    State(state): State<AppState>,
    Json(request): Json<LoginUserRequest>,
) -> Result<Json<ParentLoginResponse>, ApiError> {
    request.validate()?;

    let parent = state
        .users
        .find_by_email_and_role(&request.email, Role::Parent)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Parent account".to_string(),
            id: request.email.clone(),
        })?;

    verify_password(&state, &request.password, &parent.password_hash).await?;

    let linked_students = state
        .users
        .linked_students(&parent.email)
        .await?
        .into_iter()
        .map(UserPublic::from)
        .collect();

    let token = state
        .tokens
        .issue_user_token(parent.id, &parent.email, Role::Parent)?;

    Ok(Json(ParentLoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserPublic::from(parent),
        linked_students,
    }))
}

async fn verify_password(
    state: &AppState,
    password: &str,
    hash: &str,
) -> Result<(), ApiError> {
    if !state.passwords.verify(password, hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }
    Ok(())
}

/// Handler for PUT /user/profile
/// Updates the authenticated user's own name/email/password
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    // Admin ids come from a separate sequence; an admin token subject must
    // never resolve to a row in the users table
    if user.role == Role::Admin {
        return Err(ApiError::Forbidden(
            "Admin accounts cannot modify user profiles".to_string(),
        ));
    }

    let password_hash = match &request.password {
        Some(password) => Some(state.passwords.hash(password)?),
        None => None,
    };

    state
        .users
        .update_profile(
            user.user_id,
            request.name.as_deref(),
            request.email.as_deref(),
            password_hash.as_deref(),
        )
        .await?;

    Ok(Json(MessageResponse::new("Profile updated successfully")))
}

/// Handler for POST /user/join-batch
/// Enrolls the authenticated student in the batch named by code
pub async fn join_batch(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<JoinBatchRequest>,
) -> Result<Json<JoinBatchResponse>, BatchError> {
    request.validate()?;

    let batch = state
        .batches
        .join_by_code(&user, &request.batch_code)
        .await?;

    Ok(Json(JoinBatchResponse {
        success: true,
        message: "Joined batch successfully".to_string(),
        batch,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MyBatchesQuery {
    pub student_id: i32,
}

/// Handler for GET /user/my-batches?student_id=…
///
/// The query id must match the token subject; whether the original intended
/// to trust the caller-supplied id is an open question, so the stricter
/// cross-check applies here.
pub async fn my_batches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<MyBatchesQuery>,
) -> Result<Json<BatchSummariesResponse>, BatchError> {
    if user.role != Role::Student {
        return Err(BatchError::NotAStudent);
    }
    if query.student_id != user.user_id {
        return Err(BatchError::IdentityMismatch);
    }

    let batches = state.batches.batches_for_student(user.user_id).await?;
    Ok(Json(BatchSummariesResponse {
        success: true,
        batches,
    }))
}

/// Handler for GET /user/parent/student-batches
/// Lists each linked student with the batches they are enrolled in
pub async fn parent_student_batches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ParentStudentBatchesResponse>, BatchError> {
    if user.role != Role::Parent {
        return Err(BatchError::NotAParent);
    }

    let students = state.batches.batches_for_parent(&user.email).await?;
    Ok(Json(ParentStudentBatchesResponse {
        success: true,
        students,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StudentBatchQuery {
    #[serde(rename = "userId")]
    pub user_id: i32,
}

/// Handler for GET /user/student/batches/:batchId?userId=…
pub async fn student_batch_detail(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(batch_id): Path<i32>,
    Query(query): Query<StudentBatchQuery>,
) -> Result<Json<BatchEnvelope>, BatchError> {
    if user.role != Role::Student {
        return Err(BatchError::NotAStudent);
    }
    if query.user_id != user.user_id {
        return Err(BatchError::IdentityMismatch);
    }

    let batch = state
        .batches
        .batch_for_student(batch_id, user.user_id)
        .await?;

    Ok(Json(BatchEnvelope {
        success: true,
        message: None,
        batch,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ParentBatchQuery {
    #[serde(rename = "parentId")]
    pub parent_id: i32,
    #[serde(rename = "studentId")]
    pub student_id: i32,
}

/// Handler for GET /user/parent/batches/:batchId?parentId=…&studentId=…
///
/// The parent may only view a batch through a student whose parent_email
/// matches their own email and who is enrolled in the batch.
pub async fn parent_batch_detail(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(batch_id): Path<i32>,
    Query(query): Query<ParentBatchQuery>,
) -> Result<Json<BatchEnvelope>, BatchError> {
    if user.role != Role::Parent {
        return Err(BatchError::NotAParent);
    }
    if query.parent_id != user.user_id {
        return Err(BatchError::IdentityMismatch);
    }

    let batch = state
        .batches
        .batch_for_parent(batch_id, &user.email, query.student_id)
        .await?;

    Ok(Json(BatchEnvelope {
        success: true,
        message: None,
        batch,
    }))
}
