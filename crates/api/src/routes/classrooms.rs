//! Route definitions for the `/classrooms` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::classrooms;
use crate::state::AppState;

/// Routes mounted at `/classrooms`.
///
/// ```text
/// GET    /       -> list_classrooms
/// POST   /       -> create_classroom (admin)
/// GET    /{id}   -> get_classroom
/// PUT    /{id}   -> update_classroom (admin)
/// DELETE /{id}   -> delete_classroom (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(classrooms::list_classrooms).post(classrooms::create_classroom),
        )
        .route(
            "/{id}",
            get(classrooms::get_classroom)
                .put(classrooms::update_classroom)
                .delete(classrooms::delete_classroom),
        )
}
