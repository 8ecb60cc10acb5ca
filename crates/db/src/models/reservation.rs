//! Row model for the `reservations` table.

use sqlx::FromRow;
use unispace_core::model::Reservation;
use unispace_core::types::{CalendarDate, DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct ReservationRow {
    pub id: DbId,
    pub classroom_id: DbId,
    pub user_id: DbId,
    pub date: CalendarDate,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id,
            classroom_id: row.classroom_id,
            user_id: row.user_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            purpose: row.purpose,
            created_at: row.created_at,
        }
    }
}
