use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Live session
        .route("/session", get(handlers::get_session))
        .route("/session/input", post(handlers::set_input))
        .route("/session/turns", post(handlers::submit_turn))
        .route("/session/listen/start", post(handlers::start_listening))
        .route("/session/listen/stop", post(handlers::stop_listening))
        .route("/session/end", post(handlers::end_session))
        .route("/session/new", post(handlers::new_session))
        // History and insights
        .route("/history", get(handlers::get_history))
        .route("/history/latest", get(handlers::get_latest_session))
        .route("/insights", get(handlers::get_insights))
        // Profile
        .route("/profile", get(handlers::get_profile))
        .route("/profile/preferences", post(handlers::update_preferences))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
