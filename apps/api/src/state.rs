use std::sync::Arc;

use crate::conversation::coordinator::TurnCoordinator;
use crate::profile::source::ProfileSource;
use crate::session::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub coordinator: Arc<TurnCoordinator>,
    /// Pluggable profile acquisition. Default: HttpProfileSource.
    pub profile_source: Arc<dyn ProfileSource>,
}
