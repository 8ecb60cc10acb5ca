//! Row structs.
//!
//! Each submodule contains a `FromRow` struct mirroring one table and the
//! conversion into the matching `unispace_core::model` entity. Insert and
//! update DTOs live in core because the store traits accept them.

pub mod classroom;
pub mod reservation;
pub mod user;
