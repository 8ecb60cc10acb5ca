//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument and return raw `sqlx` results.

pub mod classroom_repo;
pub mod reservation_repo;
pub mod user_repo;

pub use classroom_repo::ClassroomRepo;
pub use reservation_repo::ReservationRepo;
pub use user_repo::UserRepo;
