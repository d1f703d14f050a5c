use std::collections::HashMap;
use std::sync::Arc;

use aerobook_core::session::BookingSession;
use aerobook_store::{PgBookingRepository, PgFlightRepository, PgPool, PgUserRepository};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Live booking sessions, keyed by the transient handle handed to the
/// client. Each session is the explicit context object the screens of one
/// flow share.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, BookingSession>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, id: Uuid, session: BookingSession) {
        self.sessions.write().await.insert(id, session);
    }

    pub async fn remove(&self, id: &Uuid) -> Option<BookingSession> {
        self.sessions.write().await.remove(id)
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, BookingSession>> {
        self.sessions.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, BookingSession>> {
        self.sessions.write().await
    }
}

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<PgFlightRepository>,
    pub bookings: Arc<PgBookingRepository>,
    pub users: Arc<PgUserRepository>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            flights: Arc::new(PgFlightRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            sessions: SessionRegistry::default(),
        }
    }
}
