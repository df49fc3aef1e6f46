// HTTP handlers for administrator endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::admin::models::{
    AdminLoginFields, AdminPublic, LoginAdminRequest, LoginAdminResponse, RegisterAdminRequest,
    RegisterAdminResponse, TeachersResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /admin/register
/// Creates an administrator account and returns a 1-hour token
#[utoipa::path(
    post,
    path = "/admin/register",
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Administrator registered", body = RegisterAdminResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already registered")
    ),
    tag = "admin"
)]
pub async fn register_admin(
    State(state): State<AppState>,
    Json(request): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<RegisterAdminResponse>), ApiError> {
    request.validate()?;

    // Pre-check for a friendly message; the unique index catches races
    if state.admins.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state.passwords.hash(&request.password)?;
    let admin = state
        .admins
        .create(&request.name, &request.email, &password_hash)
        .await?;

    let token = state.tokens.issue_admin_token(admin.id, &admin.email)?;

    tracing::info!("Registered admin {} ({})", admin.id, admin.email);
    Ok((
        StatusCode::CREATED,
        Json(RegisterAdminResponse {
            success: true,
            message: "Admin registered successfully".to_string(),
            token,
            admin: AdminPublic::from(admin),
        }),
    ))
}

/// Handler for POST /admin/login
///
/// An unknown email fails NotFound; a known email with a wrong password
/// fails Unauthorized.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginAdminRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginAdminResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No admin account for this email")
    ),
    tag = "admin"
)]
pub async fn login_admin(
    State(state): State<AppState>,
    Json(request): Json<LoginAdminRequest>,
) -> Result<Json<LoginAdminResponse>, ApiError> {
    request.validate()?;

    let admin = state
        .admins
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Admin account".to_string(),
            id: request.email.clone(),
        })?;

    if !state
        .passwords
        .verify(&request.password, &admin.password_hash)?
    {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state.tokens.issue_admin_token(admin.id, &admin.email)?;

    Ok(Json(LoginAdminResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        admin: AdminLoginFields {
            name: admin.name,
            email: admin.email,
        },
    }))
}

/// Handler for GET /admin/teachers
/// Lists all administrators with public fields only
#[utoipa::path(
    get,
    path = "/admin/teachers",
    responses(
        (status = 200, description = "All registered teachers", body = TeachersResponse)
    ),
    tag = "admin"
)]
pub async fn list_teachers(
    State(state): State<AppState>,
) -> Result<Json<TeachersResponse>, ApiError> {
    let teachers = state
        .admins
        .list()
        .await?
        .into_iter()
        .map(AdminPublic::from)
        .collect();

    Ok(Json(TeachersResponse {
        success: true,
        teachers,
    }))
}
