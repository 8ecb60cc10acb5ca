//! Repository for the `reservations` table.
//!
//! Inserts and updates may fail with SQLSTATE `23P01` from the
//! `ex_reservations_no_overlap` exclusion constraint when a concurrent
//! writer got there first.

use sqlx::PgPool;
use unispace_core::model::{NewReservation, ReservationSchedule};
use unispace_core::types::{CalendarDate, DbId};

use crate::models::reservation::ReservationRow;

const COLUMNS: &str = "id, classroom_id, user_id, date, start_time, end_time, purpose, \
                       created_at, updated_at";

pub struct ReservationRepo;

impl ReservationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &NewReservation,
    ) -> Result<ReservationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations (classroom_id, user_id, date, start_time, end_time, purpose)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(input.classroom_id)
            .bind(input.user_id)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.purpose)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReservationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every reservation of `classroom_id` on `date`, optionally skipping one.
    pub async fn find_by_classroom_and_date(
        pool: &PgPool,
        classroom_id: DbId,
        date: CalendarDate,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<ReservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations
             WHERE classroom_id = $1
               AND date = $2
               AND ($3::BIGINT IS NULL OR id <> $3)
             ORDER BY start_time"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(classroom_id)
            .bind(date)
            .bind(exclude_id)
            .fetch_all(pool)
            .await
    }

    /// List all reservations, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ReservationRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reservations ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ReservationRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace the schedule and purpose of a reservation.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ReservationSchedule,
    ) -> Result<Option<ReservationRow>, sqlx::Error> {
        let query = format!(
            "UPDATE reservations SET
                date = $2,
                start_time = $3,
                end_time = $4,
                purpose = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.purpose)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
