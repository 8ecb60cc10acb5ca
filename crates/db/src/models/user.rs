//! Row model for the `users` table.

use sqlx::FromRow;
use unispace_core::error::CoreError;
use unispace_core::model::User;
use unispace_core::roles::Role;
use unispace_core::types::{DbId, Timestamp};

/// Full user row, password hash included.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    /// One of `STUDENT`, `NASTAVNIK`, `ADMIN` (enforced by `ck_users_role`).
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<UserRow> for User {
    type Error = CoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            CoreError::Internal(format!("User {} has unknown role '{}'", row.id, row.role))
        })?;
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}
