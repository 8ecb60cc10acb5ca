pub mod auth;
pub mod classrooms;
pub mod health;
pub mod reservations;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register a student (public)
/// /auth/login                    login (public)
///
/// /users                         list (admin only)
/// /users/teachers                create instructor (admin only)
/// /users/{id}                    update, delete (admin only)
///
/// /classrooms                    list (public), create (admin only)
/// /classrooms/{id}               get (public), update, delete (admin only)
///
/// /reservations                  list (public), create (NASTAVNIK, ADMIN)
/// /reservations/{id}             get (public), update, delete (owner or ADMIN)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/classrooms", classrooms::router())
        .nest("/reservations", reservations::router())
}
