use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::session::context::SessionContext;

/// Live sessions keyed by id. Sessions share nothing; the map shards its own locking.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<SessionContext>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: SessionContext) -> Arc<SessionContext> {
        let session = Arc::new(session);
        self.sessions.insert(session.id(), session.clone());
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<SessionContext>> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: Uuid) -> Option<Arc<SessionContext>> {
        self.sessions.remove(&id).map(|(_, session)| session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
