//! Authorization policy table.
//!
//! Every role rule in the system lives in [`authorize`]. Handlers never
//! compare role names themselves; they name the [`Action`] they are about
//! to perform and, for owned resources, pass the owner id.
//!
//! Evaluation order is fixed: role first, then ownership. Existence of the
//! target is checked by the caller only after `authorize` succeeds, so a
//! missing resource reports `Forbidden` to a caller who would not have been
//! allowed to touch it anyway.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The decoded, trusted caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub subject_id: DbId,
    pub role: Role,
}

impl Identity {
    pub fn new(subject_id: DbId, role: Role) -> Self {
        Self { subject_id, role }
    }
}

/// Something a caller asks permission to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create, update, or delete classrooms.
    ManageClassrooms,
    /// List, create, update, or delete user accounts.
    ManageUsers,
    CreateReservation,
    UpdateReservation,
    DeleteReservation,
}

impl Action {
    fn describe(self) -> &'static str {
        match self {
            Action::ManageClassrooms => "manage classrooms",
            Action::ManageUsers => "manage users",
            Action::CreateReservation => "create reservations",
            Action::UpdateReservation => "modify reservations",
            Action::DeleteReservation => "delete reservations",
        }
    }
}

/// Decide whether `identity` may perform `action`.
///
/// `resource_owner_id` is the creator of the targeted reservation, or `None`
/// when there is no target or it does not exist.
pub fn authorize(
    identity: &Identity,
    action: Action,
    resource_owner_id: Option<DbId>,
) -> Result<(), CoreError> {
    match (identity.role, action) {
        (Role::Admin, _) => Ok(()),

        (Role::Nastavnik, Action::CreateReservation) => Ok(()),
        (Role::Nastavnik, Action::UpdateReservation | Action::DeleteReservation) => {
            if resource_owner_id == Some(identity.subject_id) {
                Ok(())
            } else {
                Err(CoreError::Forbidden(format!(
                    "You can only {} you created",
                    match action {
                        Action::DeleteReservation => "delete reservations",
                        _ => "modify reservations",
                    }
                )))
            }
        }
        (Role::Nastavnik, Action::ManageClassrooms | Action::ManageUsers) => Err(
            CoreError::Forbidden(format!("Admin role required to {}", action.describe())),
        ),

        (Role::Student, Action::ManageClassrooms | Action::ManageUsers) => Err(
            CoreError::Forbidden(format!("Admin role required to {}", action.describe())),
        ),
        (Role::Student, _) => Err(CoreError::Forbidden(format!(
            "Students cannot {}",
            action.describe()
        ))),
    }
}
