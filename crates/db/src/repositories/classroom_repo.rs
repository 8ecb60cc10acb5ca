//! Repository for the `classrooms` table.

use sqlx::PgPool;
use unispace_core::model::{ClassroomChanges, NewClassroom};
use unispace_core::types::DbId;

use crate::models::classroom::ClassroomRow;

const COLUMNS: &str =
    "id, name, building, floor, capacity, image, description, created_at, updated_at";

pub struct ClassroomRepo;

impl ClassroomRepo {
    pub async fn create(pool: &PgPool, input: &NewClassroom) -> Result<ClassroomRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO classrooms (name, building, floor, capacity, image, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassroomRow>(&query)
            .bind(&input.name)
            .bind(&input.building)
            .bind(input.floor)
            .bind(input.capacity)
            .bind(&input.image)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClassroomRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms WHERE id = $1");
        sqlx::query_as::<_, ClassroomRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Cheaper than [`Self::find_by_id`] when only presence matters.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM classrooms WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// List all classrooms, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ClassroomRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ClassroomRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Partial update; `None` fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ClassroomChanges,
    ) -> Result<Option<ClassroomRow>, sqlx::Error> {
        let query = format!(
            "UPDATE classrooms SET
                name = COALESCE($2, name),
                building = COALESCE($3, building),
                floor = COALESCE($4, floor),
                capacity = COALESCE($5, capacity),
                image = COALESCE($6, image),
                description = COALESCE($7, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassroomRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.building)
            .bind(input.floor)
            .bind(input.capacity)
            .bind(&input.image)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a classroom and, by cascade, its reservations.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
