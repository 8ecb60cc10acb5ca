//! Translation of `sqlx` failures into the core error taxonomy.
//!
//! Constraint names in the migrations follow a prefix convention that this
//! module relies on: `uq_` unique, `ck_` check, `ex_` exclusion.

use unispace_core::error::CoreError;

/// PostgreSQL SQLSTATE codes we classify.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const EXCLUSION_VIOLATION: &str = "23P01";

/// Map a `sqlx` error onto [`CoreError`].
///
/// Constraint violations become domain errors. Everything else is an
/// [`CoreError::Internal`] with the driver message kept for the log only.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some(EXCLUSION_VIOLATION) => {
                return CoreError::Conflict("Time slot already reserved".into());
            }
            Some(UNIQUE_VIOLATION) if constraint == "uq_users_email" => {
                return CoreError::Conflict("Email already exists".into());
            }
            Some(UNIQUE_VIOLATION) => {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CoreError::InvalidInput(
                    "Referenced classroom or user does not exist".into(),
                );
            }
            Some(CHECK_VIOLATION) => {
                return CoreError::InvalidInput(format!(
                    "Value violates check constraint: {constraint}"
                ));
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("Database error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_internal() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, CoreError::Internal(_)));
        assert!(!err.is_domain());
    }

    #[test]
    fn row_not_found_is_internal() {
        // Repositories use `fetch_optional`; a stray RowNotFound is a bug.
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            CoreError::Internal(_)
        ));
    }
}
