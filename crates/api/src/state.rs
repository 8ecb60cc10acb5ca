use std::sync::Arc;

use unispace_core::scheduling::ReservationScheduler;
use unispace_core::store::{ClassroomStore, ReservationStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Stores are trait
/// objects so the binary can use PostgreSQL and tests an in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub users: Arc<dyn UserStore>,
    pub classrooms: Arc<dyn ClassroomStore>,
    pub reservations: Arc<dyn ReservationStore>,
    /// Admission control for reservation writes.
    pub scheduler: ReservationScheduler,
}

impl AppState {
    /// Wire the state around a single value implementing every store trait.
    pub fn new<S>(config: ServerConfig, store: S) -> Self
    where
        S: UserStore + ClassroomStore + ReservationStore + Clone + 'static,
    {
        let users: Arc<dyn UserStore> = Arc::new(store.clone());
        let classrooms: Arc<dyn ClassroomStore> = Arc::new(store.clone());
        let reservations: Arc<dyn ReservationStore> = Arc::new(store);
        let scheduler = ReservationScheduler::new(reservations.clone(), classrooms.clone());

        Self {
            config: Arc::new(config),
            users,
            classrooms,
            reservations,
            scheduler,
        }
    }
}
