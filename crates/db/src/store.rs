//! [`PgStore`]: the PostgreSQL implementation of the core store traits.
//!
//! Thin adapter over the repositories. Rows are converted into core entities
//! and `sqlx` errors are classified by [`map_sqlx_error`].

use async_trait::async_trait;
use unispace_core::error::CoreError;
use unispace_core::model::{
    Classroom, ClassroomChanges, NewClassroom, NewReservation, NewUser, Reservation,
    ReservationSchedule, User, UserChanges,
};
use unispace_core::store::{ClassroomStore, ReservationStore, UserStore};
use unispace_core::types::{CalendarDate, DbId};

use crate::error::map_sqlx_error;
use crate::repositories::{ClassroomRepo, ReservationRepo, UserRepo};
use crate::DbPool;

/// Store backed by a shared connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn list(&self) -> Result<Vec<Reservation>, CoreError> {
        let rows = ReservationRepo::list(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Reservation>, CoreError> {
        let row = ReservationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Reservation::from))
    }

    async fn find_by_classroom_and_date(
        &self,
        classroom_id: DbId,
        date: CalendarDate,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Reservation>, CoreError> {
        let rows =
            ReservationRepo::find_by_classroom_and_date(&self.pool, classroom_id, date, exclude_id)
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn create(&self, input: &NewReservation) -> Result<Reservation, CoreError> {
        let row = ReservationRepo::create(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: DbId,
        input: &ReservationSchedule,
    ) -> Result<Option<Reservation>, CoreError> {
        let row = ReservationRepo::update(&self.pool, id, input)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Reservation::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        ReservationRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ClassroomStore for PgStore {
    async fn list(&self) -> Result<Vec<Classroom>, CoreError> {
        let rows = ClassroomRepo::list(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Classroom::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Classroom>, CoreError> {
        let row = ClassroomRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Classroom::from))
    }

    async fn exists(&self, id: DbId) -> Result<bool, CoreError> {
        ClassroomRepo::exists(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create(&self, input: &NewClassroom) -> Result<Classroom, CoreError> {
        let row = ClassroomRepo::create(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: DbId,
        input: &ClassroomChanges,
    ) -> Result<Option<Classroom>, CoreError> {
        let row = ClassroomRepo::update(&self.pool, id, input)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Classroom::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        ClassroomRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list(&self) -> Result<Vec<User>, CoreError> {
        let rows = UserRepo::list(&self.pool).await.map_err(map_sqlx_error)?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(map_sqlx_error)?;
        row.map(User::try_from).transpose()
    }

    async fn create(&self, input: &NewUser) -> Result<User, CoreError> {
        let row = UserRepo::create(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?;
        row.try_into()
    }

    async fn update(&self, id: DbId, input: &UserChanges) -> Result<Option<User>, CoreError> {
        let row = UserRepo::update(&self.pool, id, input)
            .await
            .map_err(map_sqlx_error)?;
        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        UserRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }
}
