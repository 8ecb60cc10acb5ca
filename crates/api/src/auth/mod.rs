//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification, strength rules.
//! - [`jwt`] -- JWT access-token generation/validation and the
//!   credential-to-[`Identity`](unispace_core::authorization::Identity) step.

pub mod jwt;
pub mod password;
