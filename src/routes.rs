use crate::{
    handlers, // Import handlers module
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/board", get(handlers::board_json))
        .route("/form/toggle", post(handlers::toggle_form))
        .route("/toys", post(handlers::submit_toy))
        .route("/toys/{id}/like", post(handlers::like_toy))
        // Middleware Layers
        .layer(TraceLayer::new_for_http())
        .with_state(state) // Pass the application state
}
