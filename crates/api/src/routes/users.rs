//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// All routes require the `ADMIN` role (enforced by handler extractors).
///
/// ```text
/// GET    /           -> list_users
/// POST   /teachers   -> create_teacher
/// PUT    /{id}       -> update_user
/// DELETE /{id}       -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/teachers", post(users::create_teacher))
        .route("/{id}", put(users::update_user).delete(users::delete_user))
}
