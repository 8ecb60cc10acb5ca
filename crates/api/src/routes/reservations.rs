//! Route definitions for the `/reservations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

/// Routes mounted at `/reservations`.
///
/// ```text
/// GET    /       -> list_reservations
/// POST   /       -> create_reservation (NASTAVNIK, ADMIN)
/// GET    /{id}   -> get_reservation
/// PUT    /{id}   -> update_reservation (owner or ADMIN)
/// DELETE /{id}   -> delete_reservation (owner or ADMIN)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
}
