//! Row model for the `classrooms` table.

use sqlx::FromRow;
use unispace_core::model::Classroom;
use unispace_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct ClassroomRow {
    pub id: DbId,
    pub name: String,
    pub building: String,
    pub floor: i32,
    pub capacity: i32,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ClassroomRow> for Classroom {
    fn from(row: ClassroomRow) -> Self {
        Classroom {
            id: row.id,
            name: row.name,
            building: row.building,
            floor: row.floor,
            capacity: row.capacity,
            image: row.image,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
