//! Handlers for the `/reservations` resource.
//!
//! Reads are public. Writes go through [`ReservationScheduler`], which owns
//! the authorization, validation, and overlap rules; handlers only translate
//! between JSON and the scheduler's types.
//!
//! [`ReservationScheduler`]: unispace_core::scheduling::ReservationScheduler

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use unispace_core::authorization::{authorize, Action};
use unispace_core::error::CoreError;
use unispace_core::model::{Reservation, ReservationDetails, UserSummary};
use unispace_core::scheduling::{ReservationPatch, ReservationRequest};
use unispace_core::types::{CalendarDate, DbId, Timestamp};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /reservations`.
///
/// Every field is optional at the JSON level so that an incomplete body is
/// reported as "Missing required fields" rather than a parser message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub classroom_id: Option<DbId>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<CalendarDate>,
    /// RFC 3339 instant.
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub purpose: Option<String>,
}

impl CreateReservationRequest {
    fn into_request(self) -> Result<ReservationRequest, CoreError> {
        match (self.classroom_id, self.date, self.start_time, self.end_time) {
            (Some(classroom_id), Some(date), Some(start_time), Some(end_time)) => {
                Ok(ReservationRequest {
                    classroom_id,
                    date,
                    start_time,
                    end_time,
                    purpose: self.purpose,
                })
            }
            _ => Err(CoreError::InvalidInput("Missing required fields".into())),
        }
    }
}

/// Request body for `PUT /reservations/{id}`. Absent fields keep their
/// stored value; an absent `date` follows a changed `startTime`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub date: Option<CalendarDate>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub purpose: Option<String>,
}

impl From<UpdateReservationRequest> for ReservationPatch {
    fn from(input: UpdateReservationRequest) -> Self {
        ReservationPatch {
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            purpose: input.purpose,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/reservations
///
/// All reservations, newest first, each with its classroom and a summary of
/// the user who made it. Public.
pub async fn list_reservations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    let reservations = state.reservations.list().await?;
    Ok(Json(with_details(&state, reservations).await?))
}

/// GET /api/v1/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReservationDetails>> {
    let reservation = state
        .reservations
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Reservation", id)))?;

    let classroom = state.classrooms.find_by_id(reservation.classroom_id).await?;
    let user = state
        .users
        .find_by_id(reservation.user_id)
        .await?
        .map(|u| UserSummary::from(&u));

    Ok(Json(ReservationDetails {
        classroom,
        user,
        reservation,
    }))
}

/// POST /api/v1/reservations
///
/// Admit a new reservation for the caller. Returns 201 Created.
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    body: Result<ApiJson<CreateReservationRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    // Role check precedes any body error: a student gets 403, not 400.
    authorize(&identity, Action::CreateReservation, None)?;
    let ApiJson(input) = body?;
    let request = input.into_request()?;
    let classroom_id = request.classroom_id;

    let reservation = state
        .scheduler
        .create(&identity, request)
        .await
        .inspect_err(|e| log_rejection(e, identity.subject_id, Some(classroom_id), None))?;

    tracing::info!(
        reservation_id = reservation.id,
        classroom_id = reservation.classroom_id,
        user_id = identity.subject_id,
        "Reservation admitted"
    );
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PUT /api/v1/reservations/{id}
///
/// Reschedule or re-purpose a reservation. `NASTAVNIK` may only touch their
/// own; `ADMIN` may touch any.
pub async fn update_reservation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<DbId>,
    body: Result<ApiJson<UpdateReservationRequest>, AppError>,
) -> AppResult<Json<Reservation>> {
    let input = match body {
        Ok(ApiJson(input)) => input,
        Err(rejection) => {
            state
                .scheduler
                .authorize_existing(&identity, Action::UpdateReservation, id)
                .await?;
            return Err(rejection);
        }
    };

    let reservation = state
        .scheduler
        .update(&identity, id, input.into())
        .await
        .inspect_err(|e| log_rejection(e, identity.subject_id, None, Some(id)))?;

    tracing::info!(
        reservation_id = id,
        classroom_id = reservation.classroom_id,
        user_id = identity.subject_id,
        "Reservation rescheduled"
    );
    Ok(Json(reservation))
}

/// DELETE /api/v1/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state
        .scheduler
        .delete(&identity, id)
        .await
        .inspect_err(|e| log_rejection(e, identity.subject_id, None, Some(id)))?;

    tracing::info!(
        reservation_id = id,
        classroom_id = removed.classroom_id,
        user_id = identity.subject_id,
        owner_id = removed.user_id,
        "Reservation deleted"
    );
    Ok(Json(MessageResponse::new("Reservation deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve classroom and user for each reservation with one list call per
/// table instead of one lookup per row.
async fn with_details(
    state: &AppState,
    reservations: Vec<Reservation>,
) -> AppResult<Vec<ReservationDetails>> {
    let classrooms: HashMap<DbId, _> = state
        .classrooms
        .list()
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let users: HashMap<DbId, UserSummary> = state
        .users
        .list()
        .await?
        .iter()
        .map(|u| (u.id, UserSummary::from(u)))
        .collect();

    Ok(reservations
        .into_iter()
        .map(|reservation| ReservationDetails {
            classroom: classrooms.get(&reservation.classroom_id).cloned(),
            user: users.get(&reservation.user_id).cloned(),
            reservation,
        })
        .collect())
}

/// Domain rejections are expected traffic; internal failures are logged by
/// the error response itself.
fn log_rejection(
    err: &CoreError,
    user_id: DbId,
    classroom_id: Option<DbId>,
    reservation_id: Option<DbId>,
) {
    if err.is_domain() {
        tracing::info!(
            user_id,
            ?classroom_id,
            ?reservation_id,
            error = %err,
            "Reservation rejected"
        );
    }
}
