//! Domain entities and the DTOs the store traits accept.
//!
//! Entities serialize with camelCase field names, which is the JSON shape the
//! HTTP API exposes.

use serde::Serialize;

use crate::roles::Role;
use crate::types::{CalendarDate, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user account, including its password hash.
///
/// Not `Serialize`; use [`UserResponse`] for output.
#[derive(Debug, Clone)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Public summary of a reservation's creator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial user update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

// ---------------------------------------------------------------------------
// Classrooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: DbId,
    pub name: String,
    pub building: String,
    pub floor: i32,
    pub capacity: i32,
    /// Path or URL of an uploaded picture. Upload itself happens elsewhere.
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewClassroom {
    pub name: String,
    pub building: String,
    pub floor: i32,
    pub capacity: i32,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Partial classroom update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ClassroomChanges {
    pub name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub capacity: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// A persisted (admitted) reservation.
///
/// `start_time < end_time` and `date` is the UTC calendar day of
/// `start_time`; both are enforced before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: DbId,
    pub classroom_id: DbId,
    pub user_id: DbId,
    pub date: CalendarDate,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
    pub created_at: Timestamp,
}

/// A reservation with its classroom and creator resolved, for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetails {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub classroom: Option<Classroom>,
    pub user: Option<UserSummary>,
}

/// Insert DTO. Only built by the scheduler after admission.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub classroom_id: DbId,
    pub user_id: DbId,
    pub date: CalendarDate,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
}

/// Full replacement of a reservation's schedule and purpose.
///
/// The scheduler merges a partial request with the stored row before
/// building this, so every field is concrete.
#[derive(Debug, Clone)]
pub struct ReservationSchedule {
    pub date: CalendarDate,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
}
