//! Handlers for the `/users` resource (account administration).
//!
//! All handlers require the `ADMIN` role via [`RequireUserAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use unispace_core::error::CoreError;
use unispace_core::model::{NewUser, UserChanges, UserResponse};
use unispace_core::roles::Role;
use unispace_core::types::DbId;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::rbac::RequireUserAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/teachers`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "crate::auth::password::password_strength"))]
    pub password: String,
}

/// Request body for `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "firstName must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "lastName must not be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
    #[validate(custom(function = "crate::auth::password::password_strength"))]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// List all accounts, newest first. Password hashes are never returned.
pub async fn list_users(
    State(state): State<AppState>,
    RequireUserAdmin(_admin): RequireUserAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/users/teachers
///
/// Create an instructor (`NASTAVNIK`) account. Returns 201 Created.
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireUserAdmin(admin): RequireUserAdmin,
    ApiJson(input): ApiJson<CreateTeacherRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;

    if state.users.find_by_email(&input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let teacher = state
        .users
        .create(&NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
            role: Role::Nastavnik,
        })
        .await?;

    tracing::info!(
        user_id = teacher.id,
        created_by = admin.subject_id,
        "Created instructor account"
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from(&teacher))))
}

/// PUT /api/v1/users/{id}
///
/// Update profile fields, role, or password (re-hashed).
pub async fn update_user(
    State(state): State<AppState>,
    RequireUserAdmin(admin): RequireUserAdmin,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;

    let password_hash = input
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let changes = UserChanges {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        password_hash,
        role: input.role,
    };

    let user = state
        .users
        .update(id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;

    tracing::info!(user_id = id, updated_by = admin.subject_id, "Updated user account");
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/users/{id}
///
/// Delete an account together with its reservations.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireUserAdmin(admin): RequireUserAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.users.delete(id).await? {
        return Err(AppError::Core(CoreError::not_found("User", id)));
    }

    tracing::info!(user_id = id, deleted_by = admin.subject_id, "Deleted user account");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
