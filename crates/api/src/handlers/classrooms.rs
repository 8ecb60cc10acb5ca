//! Handlers for the `/classrooms` resource.
//!
//! Reads are public; writes require the `ADMIN` role via
//! [`RequireClassroomAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use unispace_core::error::CoreError;
use unispace_core::model::{Classroom, ClassroomChanges, NewClassroom};
use unispace_core::types::DbId;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::rbac::RequireClassroomAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /classrooms`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassroomRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "building is required"))]
    pub building: String,
    pub floor: i32,
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: i32,
    /// Path or URL of an already-uploaded image.
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Request body for `PUT /classrooms/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassroomRequest {
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "building must not be empty"))]
    pub building: Option<String>,
    pub floor: Option<i32>,
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/classrooms
///
/// List all classrooms, newest first. Public.
pub async fn list_classrooms(State(state): State<AppState>) -> AppResult<Json<Vec<Classroom>>> {
    Ok(Json(state.classrooms.list().await?))
}

/// GET /api/v1/classrooms/{id}
pub async fn get_classroom(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Classroom>> {
    let classroom = state
        .classrooms
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Classroom", id)))?;
    Ok(Json(classroom))
}

/// POST /api/v1/classrooms
pub async fn create_classroom(
    State(state): State<AppState>,
    RequireClassroomAdmin(admin): RequireClassroomAdmin,
    ApiJson(input): ApiJson<CreateClassroomRequest>,
) -> AppResult<(StatusCode, Json<Classroom>)> {
    input.validate()?;

    let classroom = state
        .classrooms
        .create(&NewClassroom {
            name: input.name,
            building: input.building,
            floor: input.floor,
            capacity: input.capacity,
            image: input.image,
            description: input.description,
        })
        .await?;

    tracing::info!(
        classroom_id = classroom.id,
        created_by = admin.subject_id,
        "Created classroom"
    );
    Ok((StatusCode::CREATED, Json(classroom)))
}

/// PUT /api/v1/classrooms/{id}
pub async fn update_classroom(
    State(state): State<AppState>,
    RequireClassroomAdmin(admin): RequireClassroomAdmin,
    Path(id): Path<DbId>,
    ApiJson(input): ApiJson<UpdateClassroomRequest>,
) -> AppResult<Json<Classroom>> {
    input.validate()?;

    let changes = ClassroomChanges {
        name: input.name,
        building: input.building,
        floor: input.floor,
        capacity: input.capacity,
        image: input.image,
        description: input.description,
    };

    let classroom = state
        .classrooms
        .update(id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Classroom", id)))?;

    tracing::info!(classroom_id = id, updated_by = admin.subject_id, "Updated classroom");
    Ok(Json(classroom))
}

/// DELETE /api/v1/classrooms/{id}
///
/// Also removes every reservation of the classroom.
pub async fn delete_classroom(
    State(state): State<AppState>,
    RequireClassroomAdmin(admin): RequireClassroomAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.classrooms.delete(id).await? {
        return Err(AppError::Core(CoreError::not_found("Classroom", id)));
    }

    tracing::info!(classroom_id = id, deleted_by = admin.subject_id, "Deleted classroom");
    Ok(Json(MessageResponse::new("Classroom deleted successfully")))
}
