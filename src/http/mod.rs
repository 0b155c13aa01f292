//! HTTP API server for driving a live session
//!
//! This module provides a REST API over one `SessionEngine`:
//! - GET /session - Session snapshot (state, turns, transcript buffer)
//! - POST /session/input - Replace the text being composed
//! - POST /session/turns - Submit a user turn and get the reply
//! - POST /session/listen/start|stop - Speech capture
//! - POST /session/end - Summarize and persist the session
//! - POST /session/new - Start over after a completed session
//! - GET /history, /history/latest, /insights - Stored sessions and analytics
//! - GET /profile, POST /profile/preferences - Profile collaborator
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
