//! Storage contracts.
//!
//! The scheduler and the HTTP layer talk to persistence only through these
//! traits. `unispace-db` implements them over PostgreSQL; [`memory`] holds an
//! in-process implementation used by tests.
//!
//! Implementations must reject a reservation write that would overlap an
//! existing reservation of the same classroom with [`CoreError::Conflict`],
//! independently of any check the caller already made. The scheduler's own
//! overlap scan only provides the early, user-facing rejection.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{
    Classroom, ClassroomChanges, NewClassroom, NewReservation, NewUser, Reservation,
    ReservationSchedule, User, UserChanges,
};
use crate::types::{CalendarDate, DbId};

#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// All reservations, most recently created first.
    async fn list(&self) -> Result<Vec<Reservation>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Reservation>, CoreError>;

    /// Candidate set for an availability check: every reservation of
    /// `classroom_id` whose `date` equals `date`, minus `exclude_id`.
    async fn find_by_classroom_and_date(
        &self,
        classroom_id: DbId,
        date: CalendarDate,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Reservation>, CoreError>;

    async fn create(&self, input: &NewReservation) -> Result<Reservation, CoreError>;

    /// Returns `None` if no reservation with `id` exists.
    async fn update(
        &self,
        id: DbId,
        input: &ReservationSchedule,
    ) -> Result<Option<Reservation>, CoreError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait ClassroomStore: Send + Sync {
    /// All classrooms, most recently created first.
    async fn list(&self) -> Result<Vec<Classroom>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Classroom>, CoreError>;

    async fn exists(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn create(&self, input: &NewClassroom) -> Result<Classroom, CoreError>;

    async fn update(
        &self,
        id: DbId,
        input: &ClassroomChanges,
    ) -> Result<Option<Classroom>, CoreError>;

    /// Deletes the classroom and its reservations. Returns `true` if a row
    /// was deleted.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, most recently created first.
    async fn list(&self) -> Result<Vec<User>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// Fails with [`CoreError::Conflict`] if the email is taken.
    async fn create(&self, input: &NewUser) -> Result<User, CoreError>;

    async fn update(&self, id: DbId, input: &UserChanges) -> Result<Option<User>, CoreError>;

    /// Deletes the user and their reservations. Returns `true` if a row was
    /// deleted.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}
