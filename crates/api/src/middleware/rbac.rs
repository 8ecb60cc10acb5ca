//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and consults the authorization policy for
//! one administrative action, so admin-only routes reject before touching the
//! body or the store.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use unispace_core::authorization::{authorize, Action, Identity};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    action: Action,
) -> Result<Identity, AppError> {
    let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
    authorize(&identity, action, None)?;
    Ok(identity)
}

/// Requires permission to manage user accounts (`ADMIN`). Rejects with 403
/// Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireUserAdmin(admin): RequireUserAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireUserAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireUserAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Action::ManageUsers)
            .await
            .map(RequireUserAdmin)
    }
}

/// Requires permission to create, update, or delete classrooms (`ADMIN`).
pub struct RequireClassroomAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireClassroomAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Action::ManageClassrooms)
            .await
            .map(RequireClassroomAdmin)
    }
}
