pub mod auth;
pub mod classrooms;
pub mod reservations;
pub mod users;
