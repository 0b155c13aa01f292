use crate::profile::ProfileProvider;
use crate::session::SessionEngine;
use crate::store::SessionStore;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single live session engine served by this instance
    pub engine: SessionEngine,

    /// Finalized session history
    pub store: Arc<dyn SessionStore>,

    pub profiles: Arc<dyn ProfileProvider>,
}

impl AppState {
    pub fn new(
        engine: SessionEngine,
        store: Arc<dyn SessionStore>,
        profiles: Arc<dyn ProfileProvider>,
    ) -> Self {
        Self {
            engine,
            store,
            profiles,
        }
    }
}
