//! Error taxonomy shared by the authorization gate, the scheduler, and the
//! stores.
//!
//! Every variant except [`CoreError::Internal`] describes something the
//! caller did. `Internal` is reserved for failures of the system itself
//! (store unavailable, poisoned lock, ...) so callers never confuse
//! "you may not do this" with "the system is broken".

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Credential absent, malformed, badly signed, or expired.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Role or ownership policy violation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Overlapping interval or duplicate unique value.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or malformed required fields.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    /// `true` for every variant caused by the request rather than the system.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}
