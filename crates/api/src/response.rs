//! Shared response payloads for API handlers.
//!
//! Entities are returned bare (no envelope); these cover the responses that
//! carry no entity.

use serde::Serialize;

/// `{ "message": "..." }` body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
