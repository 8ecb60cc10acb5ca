//! Domain core for the UniSpace classroom reservation backend.
//!
//! Holds the error taxonomy, roles, the authorization policy table, the
//! reservation scheduler, and the store traits the scheduler is defined
//! against. Nothing in here knows about HTTP or SQL.

pub mod authorization;
pub mod error;
pub mod model;
pub mod roles;
pub mod scheduling;
pub mod store;
pub mod types;
