//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller's identity from a JWT Bearer token.
//! - [`rbac::RequireUserAdmin`] -- Requires permission to manage users.
//! - [`rbac::RequireClassroomAdmin`] -- Requires permission to manage classrooms.

pub mod auth;
pub mod rbac;
