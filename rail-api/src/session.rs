use rail_listing::{RouteListing, SearchState};
use rail_order::OrderMachine;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::AppError;

/// Everything one user has entered so far.
///
/// The lock around a session is never held across a backend call; fetch
/// tickets carry the request across the await instead.
#[derive(Debug)]
pub struct Session {
    pub search: SearchState,
    pub listing: RouteListing,
    pub order: OrderMachine,
}

impl Session {
    pub fn new(page_size: usize, route_fetch_limit: usize) -> Self {
        Self {
            search: SearchState::new(),
            listing: RouteListing::new(page_size, route_fetch_limit),
            order: OrderMachine::new(),
        }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory sessions keyed by id. Nothing outlives the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub async fn create(&self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;
        sessions.insert(id, Arc::new(Mutex::new(session)));
        tracing::info!(session = %id, active = sessions.len(), "Session created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }
}
